use super::Engine;

use async_trait::async_trait;

use crate::{
    api::HealthAPI,
    error::{unhealthy_error, Error},
};

#[async_trait]
impl HealthAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn check_health(&self) -> Result<(), Error> {
        self.store().ping().await.map_err(|err| {
            tracing::error!(error = %err, "database ping failed");
            unhealthy_error(err.message)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::api::HealthAPI;
    use crate::engine::test_engine;

    #[tokio::test]
    async fn check_health_test() {
        let (engine, store) = test_engine();

        tokio_test::assert_ok!(engine.check_health().await);

        store.set_offline(true);
        let err = tokio_test::assert_err!(engine.check_health().await);
        assert_eq!(err.code, 103);

        store.set_offline(false);
        tokio_test::assert_ok!(engine.check_health().await);
    }
}
