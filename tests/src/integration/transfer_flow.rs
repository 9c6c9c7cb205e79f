//! # Transfer Flow
//!
//! Transfer invariants through the orchestrator: ownership movement, fee
//! charging, at-most-once semantics, retry behavior, and the end-to-end
//! lifecycle scenario.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use certchain_client::ports::MemoryCacheStore;
    use certchain_client::{
        Address, CertificateRegistry, ChainClient, ClientConfig, ClientError, InMemoryLedger,
        Instruction, LedgerRpc, TransferOrchestrator, NETWORK_FEE_ESTIMATE_LAMPORTS,
    };

    const PROGRAM_ID: Address = Address([0x42; 32]);
    const PLATFORM: Address = Address([1; 32]);
    const W1: Address = Address([2; 32]);
    const W2: Address = Address([3; 32]);

    struct Stack {
        ledger: Arc<InMemoryLedger>,
        registry: CertificateRegistry<InMemoryLedger>,
        orchestrator: TransferOrchestrator<InMemoryLedger, MemoryCacheStore>,
    }

    fn client(ledger: &Arc<InMemoryLedger>, signer: Address) -> ChainClient<InMemoryLedger> {
        ChainClient::with_signer(
            Arc::clone(ledger),
            ClientConfig::for_testing(PROGRAM_ID),
            signer,
        )
    }

    /// Initialized ledger with one certificate minted by `W1`, orchestrator
    /// signing as `W1`.
    async fn stack() -> Stack {
        crate::integration::init_tracing();
        let ledger = Arc::new(InMemoryLedger::new(PROGRAM_ID));
        client(&ledger, PLATFORM)
            .submit(Instruction::Initialize)
            .await
            .unwrap();
        client(&ledger, W1)
            .submit(Instruction::CreateCertificate {
                title: "T".to_string(),
                description: "D".to_string(),
                metadata_uri: "ipfs://x".to_string(),
                issuer_name: "Iss".to_string(),
                recipient_name: "Rec".to_string(),
            })
            .await
            .unwrap();
        ledger.credit(W1, 1_000_000);

        let registry = CertificateRegistry::new(client(&ledger, W1));
        let orchestrator =
            TransferOrchestrator::new(client(&ledger, W1), Arc::new(MemoryCacheStore::new()));
        Stack {
            ledger,
            registry,
            orchestrator,
        }
    }

    #[tokio::test]
    async fn test_transfer_invariant_count_and_owner() {
        let s = stack().await;

        let before = s.registry.fetch_one(1).await.unwrap().unwrap();
        assert_eq!(before.owner, W1);
        assert_eq!(before.transfer_count, 0);

        let receipt = s.orchestrator.transfer(1, W2).await.unwrap();
        assert_eq!(receipt.previous_owner, W1);
        assert_eq!(receipt.new_owner, W2);
        assert_eq!(receipt.transfer_count, 1);

        let after = s.registry.fetch_one(1).await.unwrap().unwrap();
        assert_eq!(after.owner, W2);
        assert_eq!(after.transfer_count, 1);
    }

    #[tokio::test]
    async fn test_at_most_once_fee_charging() {
        let s = stack().await;

        // Absolute balances include funding airdrops, so the fee is
        // asserted as a delta around each attempt.
        let platform_before = s.ledger.balance(PLATFORM).await.unwrap();
        s.orchestrator.transfer(1, W2).await.unwrap();
        let platform_after = s.ledger.balance(PLATFORM).await.unwrap();
        assert_eq!(platform_after - platform_before, 5);

        // Identical resubmission from the original signer: rejected at
        // validation as not-owner, and no second fee moves.
        let err = s.orchestrator.transfer(1, W2).await.unwrap_err();
        match err {
            ClientError::Validation(issues) => {
                assert!(issues.iter().any(|i| i.contains("not the owner")));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(s.ledger.balance(PLATFORM).await.unwrap(), platform_after);
        assert_eq!(
            s.registry.fetch_one(1).await.unwrap().unwrap().transfer_count,
            1
        );
    }

    #[tokio::test]
    async fn test_same_owner_blocked_in_validation() {
        let s = stack().await;
        let validation = s.orchestrator.validate(1, W1).await.unwrap();
        assert!(!validation.is_valid());
        assert!(validation
            .issues
            .iter()
            .any(|i| i.contains("same wallet")));
    }

    #[tokio::test]
    async fn test_quote_is_fee_plus_network_estimate() {
        let s = stack().await;
        let quote = s.orchestrator.estimate_costs().await.unwrap();
        assert_eq!(quote.platform_fee, 5);
        assert_eq!(quote.total, 5 + NETWORK_FEE_ESTIMATE_LAMPORTS);

        // Idempotent.
        let again = s.orchestrator.estimate_costs().await.unwrap();
        assert_eq!(quote, again);
    }

    #[tokio::test]
    async fn test_transient_failures_retried_transparently() {
        let s = stack().await;
        s.ledger.inject_transient_failures(2);

        let receipt = s.orchestrator.transfer(1, W2).await.unwrap();
        assert_eq!(receipt.new_owner, W2);
        assert_eq!(
            s.registry.fetch_one(1).await.unwrap().unwrap().transfer_count,
            1
        );
    }

    #[tokio::test]
    async fn test_retry_exhaustion_reports_attempts() {
        let s = stack().await;
        s.ledger.inject_transient_failures(5);

        let err = s.orchestrator.transfer(1, W2).await.unwrap_err();
        assert!(matches!(err, ClientError::RetriesExhausted { attempts: 3 }));
    }

    #[tokio::test]
    async fn test_end_to_end_lifecycle() {
        let ledger = Arc::new(InMemoryLedger::new(PROGRAM_ID));
        let platform = client(&ledger, PLATFORM);
        let w1 = client(&ledger, W1);
        let registry = CertificateRegistry::new(client(&ledger, W1));

        // Empty program state, then one mint.
        platform.submit(Instruction::Initialize).await.unwrap();
        w1.submit(Instruction::CreateCertificate {
            title: "T".to_string(),
            description: "D".to_string(),
            metadata_uri: "ipfs://x".to_string(),
            issuer_name: "Iss".to_string(),
            recipient_name: "Rec".to_string(),
        })
        .await
        .unwrap();

        let listed = registry.list_active(None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].certificate_id, 1);
        assert!(!listed[0].is_verified);

        // Verify flips the flag.
        w1.submit(Instruction::VerifyCertificate { certificate_id: 1 })
            .await
            .unwrap();
        assert!(registry.fetch_one(1).await.unwrap().unwrap().is_verified);

        // Transfer to W2 succeeds once.
        ledger.credit(W1, 1_000_000);
        let orchestrator =
            TransferOrchestrator::new(client(&ledger, W1), Arc::new(MemoryCacheStore::new()));
        let receipt = orchestrator.transfer(1, W2).await.unwrap();
        assert_eq!(receipt.transfer_count, 1);

        let cert = registry.fetch_one(1).await.unwrap().unwrap();
        assert_eq!(cert.owner, W2);
        assert_eq!(cert.transfer_count, 1);

        // Second attempt from the original signer fails as not-owner.
        let err = orchestrator.transfer(1, W2).await.unwrap_err();
        match err {
            ClientError::Validation(issues) => {
                assert!(issues.iter().any(|i| i.contains("not the owner")));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }
}
