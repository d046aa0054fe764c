// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The `compliants` anonymous reporting contract.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::info;

use super::{
    ledger::{Circuit, CircuitOutput, ReportLedger},
    required, CallOutcome, ContractError, ContractProviders, InstitutionType, PublicDataProvider,
    Report, ReportContract, SubmitReportArgs, SubmittedReport,
};
use crate::wallet::{Transaction, TxId, WalletTxProvider};

pub const CONTRACT_NAME: &str = "compliants";

/// Identifier under which the contract's private state is kept.
pub const PRIVATE_STATE_ID: &str = "compliantsState";

const INFORMER_DOMAIN: &[u8] = b"compliants:informer:";

/// Hex SHA-256 of `domain || secret`.
pub fn commitment(domain: &[u8], secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(secret.trim().as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Informer identity derived from the caller's secret key.
pub fn informer_commitment(secret_key: &str) -> String {
    commitment(INFORMER_DOMAIN, secret_key)
}

/// Handle to a deployed `compliants` instance.
///
/// State-changing calls from one handle run one at a time, from the state
/// read through submission, so each is built against the state left by the
/// previous one. Calls from other parties that land in between make the
/// ledger reject the transaction instead of applying it with a different
/// result.
pub struct DeployedCompliants {
    address: String,
    private_state_id: String,
    informer: String,
    tx: WalletTxProvider,
    public_data: Arc<dyn PublicDataProvider>,
    calls: Mutex<()>,
}

/// Attach to the contract at `address`, failing if nothing is deployed there.
pub async fn find_deployed_contract(
    providers: ContractProviders,
    address: &str,
    private_state_id: &str,
    informer: String,
) -> Result<DeployedCompliants, ContractError> {
    let state = providers
        .public_data
        .query_contract_state(address)
        .await?
        .ok_or_else(|| ContractError::NotDeployed(address.to_string()))?;

    info!(
        contract_address = %address,
        reports = state.reports_count,
        "Attached to deployed contract"
    );

    Ok(DeployedCompliants {
        address: address.to_string(),
        private_state_id: private_state_id.to_string(),
        informer,
        tx: providers.tx,
        public_data: providers.public_data,
        calls: Mutex::new(()),
    })
}

impl DeployedCompliants {
    async fn read_state(&self) -> Result<ReportLedger, ContractError> {
        self.public_data
            .query_contract_state(&self.address)
            .await?
            .ok_or_else(|| ContractError::NotDeployed(self.address.clone()))
    }

    /// Execute `call` locally, then balance, prove and submit it.
    async fn call_tx(&self, call: Circuit) -> Result<(TxId, CircuitOutput), ContractError> {
        let _turn = self.calls.lock().await;

        let mut state = self.read_state().await?;
        let output = state.execute(&call, &self.informer)?;

        let circuit = call.name();
        let tx = Transaction::call(
            &self.address,
            &self.private_state_id,
            &self.informer,
            call,
            output.clone(),
        );
        let balanced = self.tx.balance_tx(tx, Vec::new()).await?;
        let tx_id = self.tx.submit_tx(balanced).await?;

        info!(
            contract_address = %self.address,
            circuit,
            tx_id = %tx_id,
            "Contract call submitted"
        );
        Ok((tx_id, output))
    }
}

#[async_trait]
impl ReportContract for DeployedCompliants {
    fn address(&self) -> &str {
        &self.address
    }

    async fn submit_report(&self, args: SubmitReportArgs) -> Result<SubmittedReport, ContractError> {
        let institution_name = required(args.institution_name, "institution_name")?;
        let report_details = required(args.report_details, "report_details")?;
        let institution_type =
            InstitutionType::try_from(required(args.institution_type, "institution_type")?)?;
        let timestamp = args
            .timestamp
            .filter(|ts| *ts != 0)
            .unwrap_or_else(unix_now);

        let (tx_id, output) = self
            .call_tx(Circuit::SubmitReport {
                institution_name,
                report_details,
                institution_type,
                timestamp,
            })
            .await?;

        match output {
            CircuitOutput::ReportId(report_id) => Ok(SubmittedReport { tx_id, report_id }),
            other => Err(ContractError::StateQuery(format!(
                "submitReport returned {other:?} instead of a report id"
            ))),
        }
    }

    /// Runs the circuit on a fresh read; nothing is submitted.
    async fn get_report(&self, report_id: u64) -> Result<Report, ContractError> {
        let mut state = self.read_state().await?;
        match state.execute(&Circuit::GetReport { report_id }, &self.informer)? {
            CircuitOutput::Report(report) => Ok(report),
            _ => Err(ContractError::ReportNotFound(report_id)),
        }
    }

    async fn update_case_status(
        &self,
        report_id: u64,
        new_status: &str,
    ) -> Result<CallOutcome, ContractError> {
        let (tx_id, _) = self
            .call_tx(Circuit::UpdateCaseStatus {
                report_id,
                new_status: new_status.to_string(),
            })
            .await?;
        Ok(CallOutcome { tx_id })
    }

    async fn send_feedback(
        &self,
        report_id: u64,
        message: &str,
    ) -> Result<CallOutcome, ContractError> {
        let (tx_id, _) = self
            .call_tx(Circuit::SendFeedback {
                report_id,
                message: message.to_string(),
            })
            .await?;
        Ok(CallOutcome { tx_id })
    }
}

fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use tokio::sync::watch;

    use crate::{
        contract::{ContractBinding, InstitutionTypeArg},
        devnet::{Devnet, SimulatedWallet},
        wallet::{CoinInfo, WalletError, WalletService, WalletSession, WalletState},
    };

    const SEED: &str = "00000000000000000000000000000000000000000000000000000000000000cc";
    const ADDRESS: &str = "addr1qxyz";

    /// Devnet wallet that takes a while to balance, as a real prover does.
    struct SlowBalancing(SimulatedWallet);

    #[async_trait]
    impl WalletService for SlowBalancing {
        async fn start(&self) -> Result<(), WalletError> {
            self.0.start().await
        }

        fn state(&self) -> watch::Receiver<WalletState> {
            self.0.state()
        }

        async fn balance_transaction(
            &self,
            tx: Transaction,
            new_coins: Vec<CoinInfo>,
        ) -> Result<Transaction, WalletError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.0.balance_transaction(tx, new_coins).await
        }

        async fn prove_transaction(&self, tx: Transaction) -> Result<Transaction, WalletError> {
            self.0.prove_transaction(tx).await
        }

        async fn submit_transaction(&self, tx: Transaction) -> Result<TxId, WalletError> {
            self.0.submit_transaction(tx).await
        }

        async fn close(&self) -> Result<(), WalletError> {
            self.0.close().await
        }
    }

    async fn providers(devnet: &Arc<Devnet>) -> ContractProviders {
        providers_with(devnet, Arc::new(devnet.wallet(SEED))).await
    }

    async fn providers_with(
        devnet: &Arc<Devnet>,
        wallet: Arc<dyn WalletService>,
    ) -> ContractProviders {
        let session = WalletSession::start(wallet).await.unwrap();
        let synced = session
            .wait_for_sync(Duration::from_secs(5), &CancellationToken::new())
            .await
            .unwrap();
        ContractProviders {
            tx: WalletTxProvider::new(session, &synced),
            public_data: devnet.clone(),
        }
    }

    async fn attached() -> (Arc<Devnet>, Arc<dyn ReportContract>) {
        let devnet = Devnet::new();
        devnet.deploy(ADDRESS).await;
        let contract = ContractBinding::Compliants
            .attach(providers(&devnet).await, ADDRESS, SEED)
            .await
            .unwrap();
        (devnet, contract)
    }

    fn city_hall() -> SubmitReportArgs {
        report_on("City Hall")
    }

    fn report_on(institution: &str) -> SubmitReportArgs {
        SubmitReportArgs {
            institution_name: Some(institution.into()),
            report_details: Some("Contracts awarded without tender".into()),
            institution_type: Some(InstitutionTypeArg::Name("PUBLIC".into())),
            timestamp: None,
        }
    }

    #[test]
    fn informer_commitment_is_stable_and_hides_the_seed() {
        let a = informer_commitment(SEED);
        assert_eq!(a, informer_commitment(SEED));
        assert_eq!(a.len(), 64);
        assert_ne!(a, SEED);
        assert_ne!(a, informer_commitment("00"));
    }

    #[tokio::test]
    async fn attach_fails_when_nothing_is_deployed() {
        let devnet = Devnet::new();
        let err = ContractBinding::Compliants
            .attach(providers(&devnet).await, ADDRESS, SEED)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ContractError::NotDeployed(_)));
    }

    #[tokio::test]
    async fn submit_then_get_report() {
        let (_devnet, contract) = attached().await;
        assert_eq!(contract.address(), ADDRESS);

        let submitted = contract.submit_report(city_hall()).await.unwrap();
        assert_eq!(submitted.report_id, 1);
        assert!(!submitted.tx_id.is_empty());

        let report = contract.get_report(1).await.unwrap();
        assert_eq!(report.institution_name, "City Hall");
        assert_eq!(report.institution_type, InstitutionType::Public);
        assert_eq!(report.informer, informer_commitment(SEED));
        assert!(report.timestamp > 0);
    }

    #[tokio::test]
    async fn explicit_timestamp_is_kept() {
        let (_devnet, contract) = attached().await;
        let mut args = city_hall();
        args.timestamp = Some(1_600_000_000);
        contract.submit_report(args).await.unwrap();
        assert_eq!(contract.get_report(1).await.unwrap().timestamp, 1_600_000_000);
    }

    #[tokio::test]
    async fn missing_arguments_are_rejected_before_submission() {
        let (devnet, contract) = attached().await;
        let mut args = city_hall();
        args.institution_type = None;

        let err = contract.submit_report(args).await.unwrap_err();
        assert!(matches!(err, ContractError::MissingArgument("institution_type")));
        assert_eq!(devnet.contract_state(ADDRESS).await.unwrap().reports_count, 0);
    }

    #[tokio::test]
    async fn reviewer_calls_update_the_report() {
        let (_devnet, contract) = attached().await;
        contract.submit_report(city_hall()).await.unwrap();

        let updated = contract.update_case_status(1, "CLOSED").await.unwrap();
        let feedback = contract.send_feedback(1, "Resolved").await.unwrap();
        assert_ne!(updated.tx_id, feedback.tx_id);

        let report = contract.get_report(1).await.unwrap();
        assert_eq!(report.status, "CLOSED");
        assert_eq!(report.feedback, vec!["Resolved".to_string()]);
    }

    #[tokio::test]
    async fn calls_on_unknown_reports_fail() {
        let (_devnet, contract) = attached().await;
        assert!(matches!(
            contract.get_report(42).await.unwrap_err(),
            ContractError::ReportNotFound(42)
        ));
        assert!(matches!(
            contract.update_case_status(42, "CLOSED").await.unwrap_err(),
            ContractError::ReportNotFound(42)
        ));
    }

    #[tokio::test]
    async fn concurrent_submits_get_their_own_report_ids() {
        let devnet = Devnet::new();
        devnet.deploy(ADDRESS).await;
        let wallet = Arc::new(SlowBalancing(devnet.wallet(SEED)));
        let contract = ContractBinding::Compliants
            .attach(providers_with(&devnet, wallet).await, ADDRESS, SEED)
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            contract.submit_report(report_on("Inst 0")),
            contract.submit_report(report_on("Inst 1")),
        );
        let (first, second) = (first.unwrap(), second.unwrap());
        assert_ne!(first.report_id, second.report_id);

        for (submitted, institution) in [(first, "Inst 0"), (second, "Inst 1")] {
            let report = contract.get_report(submitted.report_id).await.unwrap();
            assert_eq!(report.institution_name, institution);
        }
    }

    #[tokio::test]
    async fn submit_racing_another_party_is_rejected_not_misnumbered() {
        let devnet = Devnet::new();
        devnet.deploy(ADDRESS).await;
        let mut handles = Vec::new();
        for _ in 0..2 {
            let wallet = Arc::new(SlowBalancing(devnet.wallet(SEED)));
            let contract = ContractBinding::Compliants
                .attach(providers_with(&devnet, wallet).await, ADDRESS, SEED)
                .await
                .unwrap();
            handles.push(contract);
        }

        let (a, b) = tokio::join!(
            handles[0].submit_report(report_on("Inst 0")),
            handles[1].submit_report(report_on("Inst 1")),
        );

        let accepted: Vec<(SubmittedReport, &str)> = [(a, "Inst 0"), (b, "Inst 1")]
            .into_iter()
            .filter_map(|(result, institution)| result.ok().map(|r| (r, institution)))
            .collect();
        assert_eq!(accepted.len(), 1);

        let (submitted, institution) = &accepted[0];
        let report = handles[0].get_report(submitted.report_id).await.unwrap();
        assert_eq!(report.institution_name, *institution);
        assert_eq!(devnet.contract_state(ADDRESS).await.unwrap().reports_count, 1);
    }
}
