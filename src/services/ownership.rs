use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TradeError;

/// 商户资源归属断言, 由商户服务远程实现。
///
/// 两个断言相互独立; 远程超时以 [`TradeError::Transport`] 上抛,
/// 绝不折算成 false。
#[async_trait]
pub trait OwnershipService: Send + Sync {
    async fn is_app_owned_by_merchant(
        &self,
        app_id: &str,
        merchant_id: i64,
    ) -> Result<bool, TradeError>;

    async fn is_store_owned_by_merchant(
        &self,
        store_id: i64,
        merchant_id: i64,
    ) -> Result<bool, TradeError>;
}

/// 校验应用与门店均归属于商户。
///
/// 无副作用, 可安全重试; 任一断言不成立立即失败,
/// 错误区分到具体资源, 便于商户侧定位配置问题。
pub struct OwnershipVerifier {
    ownership: Arc<dyn OwnershipService>,
}

impl OwnershipVerifier {
    pub fn new(ownership: Arc<dyn OwnershipService>) -> Self {
        Self { ownership }
    }

    pub async fn verify(
        &self,
        merchant_id: i64,
        app_id: &str,
        store_id: i64,
    ) -> Result<(), TradeError> {
        if !self
            .ownership
            .is_app_owned_by_merchant(app_id, merchant_id)
            .await?
        {
            return Err(TradeError::AppNotOwned);
        }

        if !self
            .ownership
            .is_store_owned_by_merchant(store_id, merchant_id)
            .await?
        {
            return Err(TradeError::StoreNotOwned);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use mockall::predicate::*;

    mock! {
        pub Ownership {}

        #[async_trait]
        impl OwnershipService for Ownership {
            async fn is_app_owned_by_merchant(
                &self,
                app_id: &str,
                merchant_id: i64,
            ) -> Result<bool, TradeError>;

            async fn is_store_owned_by_merchant(
                &self,
                store_id: i64,
                merchant_id: i64,
            ) -> Result<bool, TradeError>;
        }
    }

    #[tokio::test]
    async fn test_verify_passes_when_both_owned() {
        let mut mock = MockOwnership::new();
        mock.expect_is_app_owned_by_merchant()
            .with(eq("app-0001"), eq(1234))
            .times(1)
            .returning(|_, _| Ok(true));
        mock.expect_is_store_owned_by_merchant()
            .with(eq(8001), eq(1234))
            .times(1)
            .returning(|_, _| Ok(true));

        let verifier = OwnershipVerifier::new(Arc::new(mock));
        assert!(verifier.verify(1234, "app-0001", 8001).await.is_ok());
    }

    #[tokio::test]
    async fn test_app_not_owned_short_circuits() {
        let mut mock = MockOwnership::new();
        mock.expect_is_app_owned_by_merchant()
            .times(1)
            .returning(|_, _| Ok(false));
        // 门店断言不应被调用
        mock.expect_is_store_owned_by_merchant().times(0);

        let verifier = OwnershipVerifier::new(Arc::new(mock));
        let err = verifier.verify(1234, "app-0001", 8001).await.unwrap_err();
        assert!(matches!(err, TradeError::AppNotOwned));
        assert_eq!(err.err_code(), 200005);
    }

    #[tokio::test]
    async fn test_store_not_owned_is_distinguished() {
        let mut mock = MockOwnership::new();
        mock.expect_is_app_owned_by_merchant()
            .returning(|_, _| Ok(true));
        mock.expect_is_store_owned_by_merchant()
            .returning(|_, _| Ok(false));

        let verifier = OwnershipVerifier::new(Arc::new(mock));
        let err = verifier.verify(1234, "app-0001", 8001).await.unwrap_err();
        assert!(matches!(err, TradeError::StoreNotOwned));
        assert_eq!(err.err_code(), 200006);
    }

    #[tokio::test]
    async fn test_transport_error_is_not_false() {
        let mut mock = MockOwnership::new();
        mock.expect_is_app_owned_by_merchant()
            .returning(|_, _| Err(TradeError::Transport("连接超时".to_string())));
        mock.expect_is_store_owned_by_merchant().times(0);

        let verifier = OwnershipVerifier::new(Arc::new(mock));
        let err = verifier.verify(1234, "app-0001", 8001).await.unwrap_err();
        assert!(err.is_transient());
    }
}
