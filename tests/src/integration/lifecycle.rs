//! # Certificate Lifecycle
//!
//! Initialize, mint, verify, and enumerate through the full client stack.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use certchain_client::{
        Address, BusinessRuleViolation, CertificateRegistry, ChainClient, ClientConfig,
        ClientError, InMemoryLedger, Instruction,
    };

    const PROGRAM_ID: Address = Address([0x42; 32]);
    const PLATFORM: Address = Address([1; 32]);
    const ALICE: Address = Address([2; 32]);

    fn client(ledger: &Arc<InMemoryLedger>, signer: Address) -> ChainClient<InMemoryLedger> {
        ChainClient::with_signer(
            Arc::clone(ledger),
            ClientConfig::for_testing(PROGRAM_ID),
            signer,
        )
    }

    fn mint_instruction(title: &str) -> Instruction {
        Instruction::CreateCertificate {
            title: title.to_string(),
            description: "Awarded for completing the program".to_string(),
            metadata_uri: "ipfs://QmDoc".to_string(),
            issuer_name: "Academy".to_string(),
            recipient_name: "Alice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_initialize_then_mint_yields_monotonic_ids() {
        let ledger = Arc::new(InMemoryLedger::new(PROGRAM_ID));
        let platform = client(&ledger, PLATFORM);
        let alice = client(&ledger, ALICE);
        let registry = CertificateRegistry::new(client(&ledger, ALICE));

        platform.submit(Instruction::Initialize).await.unwrap();
        for n in 1..=5u64 {
            alice.submit(mint_instruction(&format!("Cert {n}"))).await.unwrap();
        }

        let listed = registry.list_active(None).await.unwrap();
        let ids: Vec<u64> = listed.iter().map(|c| c.certificate_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(registry.program_state().await.unwrap().certificate_count, 5);
    }

    #[tokio::test]
    async fn test_mint_before_initialize_is_rejected() {
        let ledger = Arc::new(InMemoryLedger::new(PROGRAM_ID));
        let alice = client(&ledger, ALICE);

        let err = alice.submit(mint_instruction("Early")).await.unwrap_err();
        assert!(matches!(err, ClientError::NotInitialized));
    }

    #[tokio::test]
    async fn test_field_limits_enforced_through_client() {
        let ledger = Arc::new(InMemoryLedger::new(PROGRAM_ID));
        let platform = client(&ledger, PLATFORM);
        platform.submit(Instruction::Initialize).await.unwrap();

        let err = platform
            .submit(Instruction::CreateCertificate {
                title: "t".repeat(65),
                description: "d".to_string(),
                metadata_uri: "ipfs://Qm".to_string(),
                issuer_name: "I".to_string(),
                recipient_name: "R".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::BusinessRule(BusinessRuleViolation::TitleTooLong)
        ));

        let err = platform
            .submit(Instruction::CreateCertificate {
                title: "T".to_string(),
                description: "d".to_string(),
                metadata_uri: "https://example.com/doc.json".to_string(),
                issuer_name: "I".to_string(),
                recipient_name: "R".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::BusinessRule(BusinessRuleViolation::InvalidUri)
        ));
    }

    #[tokio::test]
    async fn test_verification_lifecycle() {
        let ledger = Arc::new(InMemoryLedger::new(PROGRAM_ID));
        let platform = client(&ledger, PLATFORM);
        let alice = client(&ledger, ALICE);
        let registry = CertificateRegistry::new(client(&ledger, ALICE));

        platform.submit(Instruction::Initialize).await.unwrap();
        alice.submit(mint_instruction("Diploma")).await.unwrap();
        assert!(!registry.fetch_one(1).await.unwrap().unwrap().is_verified);

        // Creator verifies; re-verification is rejected even by the platform.
        alice
            .submit(Instruction::VerifyCertificate { certificate_id: 1 })
            .await
            .unwrap();
        assert!(registry.fetch_one(1).await.unwrap().unwrap().is_verified);

        let err = platform
            .submit(Instruction::VerifyCertificate { certificate_id: 1 })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::BusinessRule(BusinessRuleViolation::AlreadyVerified)
        ));
    }

    #[tokio::test]
    async fn test_fee_update_applies_to_state() {
        let ledger = Arc::new(InMemoryLedger::new(PROGRAM_ID));
        let platform = client(&ledger, PLATFORM);
        let registry = CertificateRegistry::new(client(&ledger, PLATFORM));

        platform.submit(Instruction::Initialize).await.unwrap();
        assert_eq!(registry.program_state().await.unwrap().platform_fee_lamports, 5);

        platform
            .submit(Instruction::UpdatePlatformFee { new_fee_lamports: 9 })
            .await
            .unwrap();
        assert_eq!(registry.program_state().await.unwrap().platform_fee_lamports, 9);
    }

    #[tokio::test]
    async fn test_stats_reflect_ownership() {
        let ledger = Arc::new(InMemoryLedger::new(PROGRAM_ID));
        let platform = client(&ledger, PLATFORM);
        let alice = client(&ledger, ALICE);
        let registry = CertificateRegistry::new(client(&ledger, ALICE));

        platform.submit(Instruction::Initialize).await.unwrap();
        alice.submit(mint_instruction("A")).await.unwrap();
        alice.submit(mint_instruction("B")).await.unwrap();
        alice
            .submit(Instruction::VerifyCertificate { certificate_id: 2 })
            .await
            .unwrap();

        let stats = registry.stats(ALICE).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.verified, 1);
        assert_eq!(stats.unique_issuers, 1);
        assert_eq!(stats.total_transfers, 0);
    }
}
