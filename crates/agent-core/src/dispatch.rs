//! ============================================================================
//! Action Dispatcher - Intent Routing
//! ============================================================================
//! Routes a classified intent to its flow and produces exactly one
//! ChatResponse. One handler per action; every handler follows the same
//! contract: client input errors surface as AgentError, domain-rule
//! outcomes (insufficient stake, missing address book, duplicate creation)
//! come back as ordinary responses with ready_to_execute=false.
//! ============================================================================

use std::sync::Arc;

use rand::RngCore;
use serde_json::Value;
use tracing::{info, warn};

use crate::amount::{parse_base_units, to_base_units};
use crate::clients::{BlockchainGateway, ContactCipher};
use crate::dry_run::{blocks_execution, DryRunBuilder};
use crate::error::AgentError;
use crate::types::{ChatResponse, ContactRecord, Intent, IntentAction, TokenType, TransactionData};

/// Routes classified intents to their action flows.
pub struct ActionDispatcher {
    gateway: Arc<dyn BlockchainGateway>,
    cipher: Arc<dyn ContactCipher>,
    dry_run: DryRunBuilder,
}

impl ActionDispatcher {
    pub fn new(
        gateway: Arc<dyn BlockchainGateway>,
        cipher: Arc<dyn ContactCipher>,
        dry_run: DryRunBuilder,
    ) -> Self {
        Self {
            gateway,
            cipher,
            dry_run,
        }
    }

    /// Produce exactly one response for the intent. Client input errors
    /// (missing user address) are the only errors surfaced to the caller
    /// besides collaborator failures.
    pub async fn dispatch(
        &self,
        intent: Intent,
        user_address: Option<&str>,
    ) -> Result<ChatResponse, AgentError> {
        info!("Dispatching action {:?}", intent.action);

        match intent.action {
            IntentAction::Ambiguous => Ok(self.handle_ambiguous(intent)),
            IntentAction::GetBalance => self.handle_get_balance(intent, user_address).await,
            IntentAction::GetStakeInfo => self.handle_get_stake_info(intent, user_address).await,
            IntentAction::StakeToken => self.handle_stake(intent, user_address).await,
            IntentAction::UnstakeToken => self.handle_unstake(intent, user_address).await,
            IntentAction::TransferToken => self.handle_transfer(intent, user_address).await,
            IntentAction::CreateAddressBook => {
                self.handle_create_address_book(intent, user_address).await
            }
            IntentAction::SaveContact => self.handle_save_contact(intent, user_address).await,
            IntentAction::ListContacts => self.handle_list_contacts(intent, user_address).await,
            IntentAction::Unknown => Ok(ChatResponse::info(
                intent,
                "I didn't understand that. Could you rephrase?",
            )),
        }
    }

    fn handle_ambiguous(&self, intent: Intent) -> ChatResponse {
        let message = intent
            .clarification_question
            .clone()
            .unwrap_or_else(|| "Could you provide more details?".to_string());
        ChatResponse::info(intent, message)
    }

    async fn handle_get_balance(
        &self,
        intent: Intent,
        user_address: Option<&str>,
    ) -> Result<ChatResponse, AgentError> {
        let address = require_address(user_address, "balance query")?;
        let token = token_of(&intent.parsed_data);

        let balance = self.gateway.get_balance(address, token).await?;
        Ok(ChatResponse::info(
            intent,
            format!(
                "Your {} balance is {}",
                token.symbol(),
                balance.balance_formatted
            ),
        ))
    }

    async fn handle_get_stake_info(
        &self,
        intent: Intent,
        user_address: Option<&str>,
    ) -> Result<ChatResponse, AgentError> {
        let address = require_address(user_address, "stake info query")?;
        let token = token_of(&intent.parsed_data);

        let stake = self.gateway.get_stake(address, token).await?;
        Ok(ChatResponse::info(
            intent,
            format!(
                "You have staked {} {} in the staking pool.",
                stake.staked_amount_formatted,
                token.symbol()
            ),
        ))
    }

    async fn handle_stake(
        &self,
        intent: Intent,
        user_address: Option<&str>,
    ) -> Result<ChatResponse, AgentError> {
        let address = require_address(user_address, "staking")?;
        let token = token_of(&intent.parsed_data);
        let amount = amount_of(&intent.parsed_data);
        let amount_base = to_base_units(amount, token.decimals())?;

        // Balance and gas estimate are independent reads.
        let (balance, gas) = tokio::try_join!(
            self.gateway.get_balance(address, token),
            self.gateway.estimate_gas_fee()
        )?;

        let dry_run = self
            .dry_run
            .build(
                "stake_token",
                "Staking Pool",
                &amount_base,
                token,
                balance.balance,
                gas,
            )
            .await?;

        let message = format!(
            "Ready to stake {} {}. Estimated gas: ~{} SUI.",
            amount,
            token.symbol(),
            dry_run.estimated_gas_fee
        );
        let ready = !blocks_execution(dry_run.risk_level);

        Ok(ChatResponse {
            intent,
            dry_run: Some(dry_run),
            ready_to_execute: ready,
            message,
            transaction_data: Some(TransactionData::StakeToken {
                amount: amount_base,
                token,
            }),
        })
    }

    async fn handle_unstake(
        &self,
        intent: Intent,
        user_address: Option<&str>,
    ) -> Result<ChatResponse, AgentError> {
        let address = require_address(user_address, "unstaking")?;
        let token = token_of(&intent.parsed_data);
        let amount = amount_of(&intent.parsed_data).to_string();
        let amount_base = to_base_units(&amount, token.decimals())?;

        let stake = self.gateway.get_stake(address, token).await?;
        if parse_base_units(&amount_base)? > stake.staked_amount {
            warn!(
                "Insufficient stake: requested {}, has {}",
                amount_base, stake.staked_amount
            );
            return Ok(ChatResponse::info(
                intent,
                format!(
                    "Insufficient staked amount. You have {} {} staked, but trying to unstake {} {}.",
                    stake.staked_amount_formatted,
                    token.symbol(),
                    amount,
                    token.symbol()
                ),
            ));
        }

        let (balance, gas) = tokio::try_join!(
            self.gateway.get_balance(address, token),
            self.gateway.estimate_gas_fee()
        )?;

        let dry_run = self
            .dry_run
            .build(
                "unstake_token",
                address,
                &amount_base,
                token,
                balance.balance,
                gas,
            )
            .await?;

        let message = format!(
            "Ready to unstake {} {}. Estimated gas: ~{} SUI.",
            amount,
            token.symbol(),
            dry_run.estimated_gas_fee
        );

        // The stake check above is the only gate for unstaking.
        Ok(ChatResponse {
            intent,
            dry_run: Some(dry_run),
            ready_to_execute: true,
            message,
            transaction_data: Some(TransactionData::UnstakeToken {
                amount: amount_base,
                token,
            }),
        })
    }

    async fn handle_transfer(
        &self,
        intent: Intent,
        user_address: Option<&str>,
    ) -> Result<ChatResponse, AgentError> {
        let address = require_address(user_address, "transfers")?;
        let token = token_of(&intent.parsed_data);
        let amount = amount_of(&intent.parsed_data).to_string();

        let recipient = match field_str(&intent.parsed_data, "recipient") {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => {
                return Ok(ChatResponse::info(
                    intent,
                    "I need a recipient address to make a transfer.",
                ))
            }
        };

        // Contact names need the on-chain address book; resolution from
        // chain data is a stub pending the VecMap decode.
        let is_contact_name = intent
            .parsed_data
            .get("is_contact_name")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if is_contact_name {
            info!("Resolving contact name: {}", recipient);
            let book = self.gateway.get_address_book(address).await?;
            let message = match book {
                None => format!(
                    "Contact '{recipient}' not found. You don't have an address book yet. \
                     Say 'Create my address book' to get started, then save contacts with \
                     'Save [name] [address] as [key]'."
                ),
                Some(book) => format!(
                    "Contact name resolution is coming soon! For now, please use the full \
                     wallet address. You can check your saved contacts in Sui Explorer using \
                     your address book ID: {}...",
                    short_id(&book.object_id, 20)
                ),
            };
            return Ok(ChatResponse::info(intent, message));
        }

        let amount_base = to_base_units(&amount, token.decimals())?;

        let (balance, gas) = tokio::try_join!(
            self.gateway.get_balance(address, token),
            self.gateway.estimate_gas_fee()
        )?;

        let dry_run = self
            .dry_run
            .build(
                "transfer_token",
                &recipient,
                &amount_base,
                token,
                balance.balance,
                gas,
            )
            .await?;

        let message = format!(
            "Ready to {}. Estimated gas: ~{} SUI.",
            dry_run.action_description, dry_run.estimated_gas_fee
        );
        let ready = !blocks_execution(dry_run.risk_level);

        Ok(ChatResponse {
            intent,
            dry_run: Some(dry_run),
            ready_to_execute: ready,
            message,
            transaction_data: Some(TransactionData::TransferToken {
                recipient,
                amount: amount_base,
                token,
            }),
        })
    }

    async fn handle_create_address_book(
        &self,
        intent: Intent,
        user_address: Option<&str>,
    ) -> Result<ChatResponse, AgentError> {
        let address = require_address(user_address, "creating an address book")?;

        // One address book per user; creation is idempotent.
        if let Some(existing) = self.gateway.get_address_book(address).await? {
            return Ok(ChatResponse::info(
                intent,
                format!(
                    "You already have an address book (ID: {}...). You can start saving contacts!",
                    short_id(&existing.object_id, 16)
                ),
            ));
        }

        let call = self.gateway.create_address_book_call();
        Ok(ChatResponse {
            intent,
            dry_run: None,
            ready_to_execute: true,
            message: "Ready to create your on-chain address book. This is a one-time setup \
                      that stores your contacts permanently on Sui. Estimated gas: ~0.01 SUI."
                .to_string(),
            transaction_data: Some(TransactionData::CreateAddressBook {
                transaction_type: call.transaction_type,
                target: call.target,
                arguments: call.arguments,
                type_arguments: call.type_arguments,
            }),
        })
    }

    async fn handle_save_contact(
        &self,
        intent: Intent,
        user_address: Option<&str>,
    ) -> Result<ChatResponse, AgentError> {
        let address = require_address(user_address, "saving a contact")?;

        let contact_key = field_str(&intent.parsed_data, "contact_key")
            .unwrap_or("")
            .to_lowercase()
            .replace(' ', "_");
        let contact_name = field_str(&intent.parsed_data, "contact_name")
            .unwrap_or("")
            .to_string();
        let contact_address = field_str(&intent.parsed_data, "contact_address")
            .unwrap_or("")
            .to_string();
        let notes = field_str(&intent.parsed_data, "notes")
            .unwrap_or("")
            .to_string();

        if contact_key.is_empty() || contact_address.is_empty() {
            return Ok(ChatResponse::info(
                intent,
                "I need a contact name/key and wallet address to save. \
                 Example: 'Save Alice's address 0x123... as alice'",
            ));
        }

        let book = match self.gateway.get_address_book(address).await? {
            Some(book) => book,
            None => {
                return Ok(ChatResponse::info(
                    intent,
                    "You don't have an address book yet. Say 'Create my address book' first!",
                ))
            }
        };

        let record = ContactRecord {
            name: contact_name.clone(),
            address: contact_address,
            notes,
        };
        let encrypted = self
            .cipher
            .encrypt_contacts(address, std::slice::from_ref(&record))
            .await?;

        let mut nonce = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce);
        let timestamp = chrono::Utc::now().timestamp();

        let call =
            self.gateway
                .add_contact_call(&book.object_id, &contact_key, &encrypted, &nonce, timestamp);

        let message = format!(
            "Ready to save '{contact_name}' as '{contact_key}' to your address book. \
             This will be encrypted and stored on-chain. Estimated gas: ~0.02 SUI."
        );
        Ok(ChatResponse {
            intent,
            dry_run: None,
            ready_to_execute: true,
            message,
            transaction_data: Some(TransactionData::SaveContact {
                transaction_type: call.transaction_type,
                target: call.target,
                arguments: call.arguments,
                type_arguments: call.type_arguments,
                contact_key,
                contact_name,
            }),
        })
    }

    async fn handle_list_contacts(
        &self,
        intent: Intent,
        user_address: Option<&str>,
    ) -> Result<ChatResponse, AgentError> {
        let address = require_address(user_address, "listing contacts")?;

        let message = match self.gateway.get_address_book(address).await? {
            None => "You don't have an address book yet. \
                     Say 'Create my address book' to get started!"
                .to_string(),
            Some(book) => format!(
                "Your address book (ID: {}...) is ready. Contact listing from on-chain data \
                 is coming soon! For now, you can save contacts using 'Save [name] [address] as [key]'.",
                short_id(&book.object_id, 16)
            ),
        };
        Ok(ChatResponse::info(intent, message))
    }
}

fn require_address<'a>(
    user_address: Option<&'a str>,
    context: &'static str,
) -> Result<&'a str, AgentError> {
    match user_address {
        Some(addr) if !addr.is_empty() => Ok(addr),
        _ => {
            warn!("Request rejected: no user address provided for {}", context);
            Err(AgentError::MissingAddress(context))
        }
    }
}

fn field_str<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

fn token_of(data: &Value) -> TokenType {
    TokenType::parse_or_default(field_str(data, "token"))
}

fn amount_of(data: &Value) -> &str {
    field_str(data, "amount").unwrap_or("0")
}

fn short_id(id: &str, len: usize) -> &str {
    &id[..id.len().min(len)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCipher, MockClassifier, MockGateway};
    use crate::types::RiskLevel;
    use serde_json::json;

    fn intent(action: IntentAction, parsed_data: Value) -> Intent {
        Intent {
            action,
            parsed_data,
            confidence: 0.95,
            clarification_question: None,
        }
    }

    fn make_dispatcher(gateway: Arc<MockGateway>, risk: RiskLevel) -> ActionDispatcher {
        let classifier = Arc::new(MockClassifier::with_risk(risk));
        ActionDispatcher::new(
            gateway,
            Arc::new(MockCipher),
            DryRunBuilder::new(classifier),
        )
    }

    const USER: Option<&str> = Some("0xuser");

    #[tokio::test]
    async fn test_ambiguous_uses_clarification_question() {
        let dispatcher = make_dispatcher(Arc::new(MockGateway::new()), RiskLevel::Low);
        let mut ambiguous = intent(IntentAction::Ambiguous, json!({}));
        ambiguous.clarification_question = Some("How much did you want to send?".into());

        let response = dispatcher.dispatch(ambiguous, USER).await.unwrap();
        assert!(!response.ready_to_execute);
        assert_eq!(response.message, "How much did you want to send?");
        assert!(response.transaction_data.is_none());
    }

    #[tokio::test]
    async fn test_balance_requires_address() {
        let dispatcher = make_dispatcher(Arc::new(MockGateway::new()), RiskLevel::Low);
        let err = dispatcher
            .dispatch(intent(IntentAction::GetBalance, json!({})), None)
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_balance_is_informational() {
        let gateway = Arc::new(MockGateway::new().with_balance(5_000_000_000));
        let dispatcher = make_dispatcher(gateway, RiskLevel::Low);

        let response = dispatcher
            .dispatch(
                intent(IntentAction::GetBalance, json!({"token": "SUI"})),
                USER,
            )
            .await
            .unwrap();
        assert!(!response.ready_to_execute);
        assert_eq!(response.message, "Your SUI balance is 5");
        assert!(response.transaction_data.is_none());
    }

    #[tokio::test]
    async fn test_transfer_low_risk_is_ready() {
        let gateway = Arc::new(MockGateway::new());
        let dispatcher = make_dispatcher(gateway.clone(), RiskLevel::Low);

        // "Send 100 SUI to 0xabc"
        let response = dispatcher
            .dispatch(
                intent(
                    IntentAction::TransferToken,
                    json!({"recipient": "0xabc", "amount": "100", "token": "SUI"}),
                ),
                USER,
            )
            .await
            .unwrap();

        assert!(response.ready_to_execute);
        assert!(response.dry_run.is_some());
        assert_eq!(
            response.transaction_data,
            Some(TransactionData::TransferToken {
                recipient: "0xabc".into(),
                amount: "100000000000".into(),
                token: TokenType::Sui,
            })
        );
    }

    #[tokio::test]
    async fn test_transfer_high_risk_blocks_execution() {
        let dispatcher = make_dispatcher(Arc::new(MockGateway::new()), RiskLevel::High);

        let response = dispatcher
            .dispatch(
                intent(
                    IntentAction::TransferToken,
                    json!({"recipient": "0xabc", "amount": "100", "token": "SUI"}),
                ),
                USER,
            )
            .await
            .unwrap();

        // Valid fields and a successful gas estimate, still not ready.
        assert!(!response.ready_to_execute);
        assert!(response.dry_run.is_some());
        assert!(response.transaction_data.is_some());
    }

    #[tokio::test]
    async fn test_transfer_usdc_uses_six_decimals() {
        let dispatcher = make_dispatcher(Arc::new(MockGateway::new()), RiskLevel::Low);

        let response = dispatcher
            .dispatch(
                intent(
                    IntentAction::TransferToken,
                    json!({"recipient": "0xabc", "amount": "1.5", "token": "USDC"}),
                ),
                USER,
            )
            .await
            .unwrap();

        assert_eq!(
            response.transaction_data,
            Some(TransactionData::TransferToken {
                recipient: "0xabc".into(),
                amount: "1500000".into(),
                token: TokenType::Usdc,
            })
        );
    }

    #[tokio::test]
    async fn test_transfer_contact_name_without_book() {
        let dispatcher = make_dispatcher(Arc::new(MockGateway::new()), RiskLevel::Low);

        let response = dispatcher
            .dispatch(
                intent(
                    IntentAction::TransferToken,
                    json!({"recipient": "Mom", "amount": "100", "token": "SUI", "is_contact_name": true}),
                ),
                USER,
            )
            .await
            .unwrap();

        assert!(!response.ready_to_execute);
        assert!(response.dry_run.is_none());
        assert!(response.transaction_data.is_none());
        assert!(response.message.contains("don't have an address book"));
    }

    #[tokio::test]
    async fn test_transfer_contact_name_with_book_is_stubbed() {
        let gateway = Arc::new(MockGateway::new().with_address_book("0xbook1234567890abcdef"));
        let dispatcher = make_dispatcher(gateway, RiskLevel::Low);

        let response = dispatcher
            .dispatch(
                intent(
                    IntentAction::TransferToken,
                    json!({"recipient": "Mom", "amount": "100", "token": "SUI", "is_contact_name": true}),
                ),
                USER,
            )
            .await
            .unwrap();

        assert!(!response.ready_to_execute);
        assert!(response.message.contains("coming soon"));
        assert!(response.transaction_data.is_none());
    }

    #[tokio::test]
    async fn test_stake_ready_unless_high_risk() {
        let dispatcher = make_dispatcher(Arc::new(MockGateway::new()), RiskLevel::Medium);

        let response = dispatcher
            .dispatch(
                intent(
                    IntentAction::StakeToken,
                    json!({"amount": "2", "token": "SUI"}),
                ),
                USER,
            )
            .await
            .unwrap();

        assert!(response.ready_to_execute);
        assert_eq!(
            response.transaction_data,
            Some(TransactionData::StakeToken {
                amount: "2000000000".into(),
                token: TokenType::Sui,
            })
        );

        let dispatcher = dispatcher_high();
        let response = dispatcher
            .dispatch(
                intent(
                    IntentAction::StakeToken,
                    json!({"amount": "2", "token": "SUI"}),
                ),
                USER,
            )
            .await
            .unwrap();
        assert!(!response.ready_to_execute);
    }

    fn dispatcher_high() -> ActionDispatcher {
        make_dispatcher(Arc::new(MockGateway::new()), RiskLevel::High)
    }

    #[tokio::test]
    async fn test_unstake_over_staked_amount_rejected() {
        // Plenty of balance, little staked: the stake check must win.
        let gateway = Arc::new(
            MockGateway::new()
                .with_balance(1_000_000_000_000)
                .with_staked(1_000_000_000),
        );
        let dispatcher = make_dispatcher(gateway.clone(), RiskLevel::Low);

        let response = dispatcher
            .dispatch(
                intent(
                    IntentAction::UnstakeToken,
                    json!({"amount": "5", "token": "SUI"}),
                ),
                USER,
            )
            .await
            .unwrap();

        assert!(!response.ready_to_execute);
        assert!(response.dry_run.is_none());
        assert!(response.transaction_data.is_none());
        assert!(response.message.contains("Insufficient staked amount"));
    }

    #[tokio::test]
    async fn test_unstake_within_stake_is_unconditionally_ready() {
        let gateway = Arc::new(MockGateway::new().with_staked(10_000_000_000));
        // Even a high risk level does not gate unstaking.
        let dispatcher = make_dispatcher(gateway, RiskLevel::High);

        let response = dispatcher
            .dispatch(
                intent(
                    IntentAction::UnstakeToken,
                    json!({"amount": "5", "token": "SUI"}),
                ),
                USER,
            )
            .await
            .unwrap();

        assert!(response.ready_to_execute);
        assert!(response.dry_run.is_some());
        assert_eq!(
            response.transaction_data,
            Some(TransactionData::UnstakeToken {
                amount: "5000000000".into(),
                token: TokenType::Sui,
            })
        );
    }

    #[tokio::test]
    async fn test_create_address_book_first_time() {
        let gateway = Arc::new(MockGateway::new());
        let dispatcher = make_dispatcher(gateway.clone(), RiskLevel::Low);

        let response = dispatcher
            .dispatch(intent(IntentAction::CreateAddressBook, json!({})), USER)
            .await
            .unwrap();

        assert!(response.ready_to_execute);
        match response.transaction_data {
            Some(TransactionData::CreateAddressBook { ref target, .. }) => {
                assert!(target.ends_with("::create_address_book"));
            }
            other => panic!("expected create_address_book payload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_address_book_is_idempotent() {
        let gateway = Arc::new(MockGateway::new().with_address_book("0xbook"));
        let dispatcher = make_dispatcher(gateway.clone(), RiskLevel::Low);

        let response = dispatcher
            .dispatch(intent(IntentAction::CreateAddressBook, json!({})), USER)
            .await
            .unwrap();

        assert!(!response.ready_to_execute);
        assert!(response.transaction_data.is_none());
        assert!(response.message.contains("already have an address book"));
        // The short-circuit must not issue a build request.
        assert!(!gateway
            .recorded()
            .contains(&"create_address_book_call".to_string()));
    }

    #[tokio::test]
    async fn test_save_contact_requires_key_and_address() {
        let gateway = Arc::new(MockGateway::new().with_address_book("0xbook"));
        let dispatcher = make_dispatcher(gateway, RiskLevel::Low);

        let response = dispatcher
            .dispatch(
                intent(
                    IntentAction::SaveContact,
                    json!({"contact_name": "Alice", "contact_address": ""}),
                ),
                USER,
            )
            .await
            .unwrap();

        assert!(!response.ready_to_execute);
        assert!(response.transaction_data.is_none());
        assert!(response.message.contains("contact name/key"));
    }

    #[tokio::test]
    async fn test_save_contact_requires_address_book() {
        let dispatcher = make_dispatcher(Arc::new(MockGateway::new()), RiskLevel::Low);

        let response = dispatcher
            .dispatch(
                intent(
                    IntentAction::SaveContact,
                    json!({"contact_key": "alice", "contact_address": "0x123"}),
                ),
                USER,
            )
            .await
            .unwrap();

        assert!(!response.ready_to_execute);
        assert!(response.message.contains("Create my address book"));
    }

    #[tokio::test]
    async fn test_save_contact_normalizes_key() {
        let gateway = Arc::new(MockGateway::new().with_address_book("0xbook"));
        let dispatcher = make_dispatcher(gateway, RiskLevel::Low);

        let response = dispatcher
            .dispatch(
                intent(
                    IntentAction::SaveContact,
                    json!({
                        "contact_key": "My Mom",
                        "contact_name": "Mom",
                        "contact_address": "0x123"
                    }),
                ),
                USER,
            )
            .await
            .unwrap();

        assert!(response.ready_to_execute);
        match response.transaction_data {
            Some(TransactionData::SaveContact {
                ref contact_key,
                ref contact_name,
                ..
            }) => {
                assert_eq!(contact_key, "my_mom");
                assert_eq!(contact_name, "Mom");
            }
            other => panic!("expected save_contact payload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_contacts_reports_book_state() {
        let dispatcher = make_dispatcher(Arc::new(MockGateway::new()), RiskLevel::Low);
        let response = dispatcher
            .dispatch(intent(IntentAction::ListContacts, json!({})), USER)
            .await
            .unwrap();
        assert!(!response.ready_to_execute);
        assert!(response.message.contains("don't have an address book"));

        let gateway = Arc::new(MockGateway::new().with_address_book("0xbook"));
        let dispatcher = make_dispatcher(gateway, RiskLevel::Low);
        let response = dispatcher
            .dispatch(intent(IntentAction::ListContacts, json!({})), USER)
            .await
            .unwrap();
        assert!(!response.ready_to_execute);
        assert!(response.message.contains("coming soon"));
    }

    #[tokio::test]
    async fn test_unknown_action_gets_generic_message() {
        let dispatcher = make_dispatcher(Arc::new(MockGateway::new()), RiskLevel::Low);
        let response = dispatcher
            .dispatch(intent(IntentAction::Unknown, json!({})), None)
            .await
            .unwrap();
        assert!(!response.ready_to_execute);
        assert!(response.message.contains("didn't understand"));
    }
}
