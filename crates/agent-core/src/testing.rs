//! Deterministic fakes for the external collaborators, shared by the unit
//! tests across modules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::clients::{mist_to_sui, BlobStore, BlockchainGateway, ContactCipher, IntentClassifier};
use crate::error::AgentError;
use crate::types::{
    AddressBook, BalanceInfo, ContactRecord, DryRunSummary, Intent, IntentAction, MoveCall,
    RiskLevel, StakeInfo, TokenType, TransactionResult,
};

// ============================================================================
// Classifier
// ============================================================================

pub struct MockClassifier {
    pub intent: Intent,
    pub risk: RiskLevel,
}

impl MockClassifier {
    pub fn with_risk(risk: RiskLevel) -> Self {
        Self {
            intent: Intent {
                action: IntentAction::Unknown,
                parsed_data: json!({}),
                confidence: 1.0,
                clarification_question: None,
            },
            risk,
        }
    }
}

#[async_trait]
impl IntentClassifier for MockClassifier {
    async fn classify(
        &self,
        _message: &str,
        _user_address: Option<&str>,
    ) -> Result<Intent, AgentError> {
        Ok(self.intent.clone())
    }

    async fn dry_run_summary(
        &self,
        action: &str,
        fields: &serde_json::Value,
        _sender_balance: u128,
        estimated_gas_mist: u64,
    ) -> Result<DryRunSummary, AgentError> {
        Ok(DryRunSummary {
            action_description: format!(
                "{} {} {} to {}",
                action,
                fields["amount"].as_str().unwrap_or("?"),
                fields["token"].as_str().unwrap_or("?"),
                fields["recipient"].as_str().unwrap_or("?")
            ),
            risk_level: self.risk,
            estimated_gas_fee: mist_to_sui(estimated_gas_mist),
        })
    }
}

// ============================================================================
// Gateway
// ============================================================================

pub struct MockGateway {
    pub balance: u128,
    pub staked: u128,
    pub gas_fee_mist: u64,
    pub address_book: Option<AddressBook>,
    pub submit_result: Option<TransactionResult>,
    /// Names of build/submit methods invoked, in order.
    pub calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            balance: 500_000_000_000,
            staked: 0,
            gas_fee_mist: 5_000_000,
            address_book: None,
            submit_result: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_balance(mut self, balance: u128) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_staked(mut self, staked: u128) -> Self {
        self.staked = staked;
        self
    }

    pub fn with_address_book(mut self, object_id: &str) -> Self {
        self.address_book = Some(AddressBook {
            object_id: object_id.to_string(),
        });
        self
    }

    pub fn with_submit_result(mut self, result: TransactionResult) -> Self {
        self.submit_result = Some(result);
        self
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub fn recorded(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlockchainGateway for MockGateway {
    async fn get_balance(
        &self,
        _address: &str,
        token: TokenType,
    ) -> Result<BalanceInfo, AgentError> {
        self.record("get_balance");
        Ok(BalanceInfo {
            token,
            balance: self.balance,
            balance_formatted: crate::amount::format_base_units(self.balance, token.decimals()),
        })
    }

    async fn get_stake(&self, _address: &str, token: TokenType) -> Result<StakeInfo, AgentError> {
        self.record("get_stake");
        Ok(StakeInfo {
            token,
            staked_amount: self.staked,
            staked_amount_formatted: crate::amount::format_base_units(
                self.staked,
                token.decimals(),
            ),
        })
    }

    async fn estimate_gas_fee(&self) -> Result<u64, AgentError> {
        self.record("estimate_gas_fee");
        Ok(self.gas_fee_mist)
    }

    async fn get_address_book(&self, _owner: &str) -> Result<Option<AddressBook>, AgentError> {
        self.record("get_address_book");
        Ok(self.address_book.clone())
    }

    fn create_address_book_call(&self) -> MoveCall {
        self.record("create_address_book_call");
        MoveCall {
            transaction_type: "moveCall".into(),
            target: "0xcc::address_book::create_address_book".into(),
            arguments: vec![],
            type_arguments: vec![],
        }
    }

    fn add_contact_call(
        &self,
        address_book_id: &str,
        contact_key: &str,
        _encrypted_data: &[u8],
        _nonce: &[u8],
        _timestamp: i64,
    ) -> MoveCall {
        self.record("add_contact_call");
        MoveCall {
            transaction_type: "moveCall".into(),
            target: "0xcc::address_book::add_contact".into(),
            arguments: vec![json!(address_book_id), json!(contact_key)],
            type_arguments: vec![],
        }
    }

    async fn build_transfer_tx(
        &self,
        _sender: &str,
        _recipient: &str,
        _amount: u128,
        _token: TokenType,
    ) -> Result<Vec<u8>, AgentError> {
        self.record("build_transfer_tx");
        Ok(b"mock-transfer-tx".to_vec())
    }

    async fn build_stake_tx(
        &self,
        _sender: &str,
        _amount: u128,
        _token: TokenType,
    ) -> Result<Vec<u8>, AgentError> {
        self.record("build_stake_tx");
        Ok(b"mock-stake-tx".to_vec())
    }

    async fn build_unstake_tx(
        &self,
        _sender: &str,
        _amount: u128,
        _token: TokenType,
    ) -> Result<Vec<u8>, AgentError> {
        self.record("build_unstake_tx");
        Ok(b"mock-unstake-tx".to_vec())
    }

    async fn submit(
        &self,
        _tx_bytes: &[u8],
        _signature: &str,
    ) -> Result<TransactionResult, AgentError> {
        self.record("submit");
        Ok(self.submit_result.clone().unwrap_or(TransactionResult {
            success: true,
            transaction_digest: Some("MockDigest111".into()),
            effects: Some(json!({"status": {"status": "success"}})),
            error: None,
        }))
    }
}

// ============================================================================
// Cipher and blob store
// ============================================================================

/// Fake cipher: "encryption" is plain JSON. Good enough to exercise the
/// merge-update flow, which never looks inside the ciphertext.
pub struct MockCipher;

#[async_trait]
impl ContactCipher for MockCipher {
    async fn encrypt_contacts(
        &self,
        _user_address: &str,
        contacts: &[ContactRecord],
    ) -> Result<Vec<u8>, AgentError> {
        serde_json::to_vec(contacts).map_err(|e| AgentError::Encryption(e.to_string()))
    }

    async fn decrypt_contacts(
        &self,
        _user_address: &str,
        ciphertext: &[u8],
    ) -> Result<Vec<ContactRecord>, AgentError> {
        serde_json::from_slice(ciphertext).map_err(|e| AgentError::Encryption(e.to_string()))
    }
}

/// In-memory blob store with sequential ids.
pub struct MockBlobStore {
    blobs: Mutex<std::collections::HashMap<String, Vec<u8>>>,
    next_id: AtomicUsize,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: Mutex::new(std::collections::HashMap::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn upload(&self, bytes: Vec<u8>) -> Result<String, AgentError> {
        let id = format!("blob-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.blobs.lock().unwrap().insert(id.clone(), bytes);
        Ok(id)
    }

    async fn download(&self, blob_id: &str) -> Result<Vec<u8>, AgentError> {
        self.blobs
            .lock()
            .unwrap()
            .get(blob_id)
            .cloned()
            .ok_or_else(|| AgentError::Storage(format!("blob {blob_id} not found")))
    }
}
