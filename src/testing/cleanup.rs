//! Cleanup Registry
//!
//! Collects teardown actions while a test runs and executes them against a
//! real test-mode client once it finishes. The test calls
//! [`CleanupRegistry::drain`] itself; nothing is hooked implicitly.
//!
//! Actions run strictly one after another in registration order. The first
//! failure stops the drain and is returned; actions queued after it are
//! dropped without running.

use crate::stripe::client::{ClientConfig, StripeClient};
use crate::stripe::credentials::get_user_stripe_key;
use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};
use std::collections::VecDeque;
use std::future::Future;

type CleanupAction = Box<dyn FnOnce(StripeClient) -> BoxFuture<'static, Result<()>> + Send>;

/// Per-test queue of teardown actions
pub struct CleanupRegistry {
    actions: VecDeque<CleanupAction>,
    stripe: StripeClient,
}

impl CleanupRegistry {
    /// Build a registry authenticated with `STRIPE_TEST_API_KEY`.
    /// Fails before any request if the key is missing or not test-mode.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let key = get_user_stripe_key()?;
        let stripe = StripeClient::with_config(&key, config)
            .context("Failed to create cleanup client")?;
        Ok(Self::with_client(stripe))
    }

    /// Use an already authenticated client
    pub fn with_client(stripe: StripeClient) -> Self {
        Self {
            actions: VecDeque::new(),
            stripe,
        }
    }

    /// Queue an action. It receives a handle to the registry's client.
    pub fn add<F, Fut>(&mut self, action: F)
    where
        F: FnOnce(StripeClient) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.actions
            .push_back(Box::new(move |stripe| action(stripe).boxed()));
    }

    pub fn delete_customer(&mut self, id: &str) {
        self.delete_resource("customers", id);
    }

    pub fn delete_plan(&mut self, id: &str) {
        self.delete_resource("plans", id);
    }

    /// Queue a delete of `id` on any catalog resource
    pub fn delete_resource(&mut self, resource_key: &str, id: &str) {
        let key = resource_key.to_string();
        let id = id.to_string();
        self.add(move |stripe| async move {
            let resource = stripe
                .resource(&key)
                .with_context(|| format!("Unknown resource: {}", key))?;
            resource
                .delete(&id)
                .await
                .with_context(|| format!("Failed to delete {} {}", key, id))?;
            Ok::<(), anyhow::Error>(())
        });
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run every queued action in order, awaiting each before the next.
    /// Returns the number of actions that ran.
    pub async fn drain(mut self) -> Result<usize> {
        let total = self.actions.len();
        let mut completed = 0;

        tracing::debug!("Draining {} cleanup action(s)", total);

        while let Some(action) = self.actions.pop_front() {
            if let Err(err) = action(self.stripe.clone()).await {
                let position = completed + 1;
                tracing::error!("Cleanup action {}/{} failed: {:#}", position, total, err);
                self.actions.clear();
                return Err(err.context(format!(
                    "Cleanup action {} of {} failed",
                    position, total
                )));
            }
            completed += 1;
        }

        tracing::info!("Cleanup complete: {}/{} action(s)", completed, total);
        Ok(completed)
    }
}

impl Drop for CleanupRegistry {
    fn drop(&mut self) {
        if !self.actions.is_empty() {
            tracing::warn!(
                "Cleanup registry dropped with {} undrained action(s)",
                self.actions.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::spy::get_spyable_stripe;
    use std::sync::{Arc, Mutex};

    fn registry() -> CleanupRegistry {
        CleanupRegistry::with_client(StripeClient::clone(&get_spyable_stripe()))
    }

    #[tokio::test]
    async fn test_empty_drain_succeeds_immediately() {
        let cleanup = registry();
        assert!(cleanup.is_empty());
        assert_eq!(cleanup.drain().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_actions_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut cleanup = registry();

        for n in 1..=3 {
            let order = order.clone();
            cleanup.add(move |_| async move {
                tokio::task::yield_now().await;
                order.lock().unwrap().push(n);
                Ok(())
            });
        }

        assert_eq!(cleanup.len(), 3);
        assert_eq!(cleanup.drain().await.unwrap(), 3);
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failure_stops_the_drain() {
        let ran = Arc::new(Mutex::new(Vec::new()));
        let mut cleanup = registry();

        let first = ran.clone();
        cleanup.add(move |_| async move {
            first.lock().unwrap().push("first");
            Ok(())
        });
        cleanup.add(|_| async { Err(anyhow::anyhow!("plan still has subscriptions")) });
        let third = ran.clone();
        cleanup.add(move |_| async move {
            third.lock().unwrap().push("third");
            Ok(())
        });

        let err = cleanup.drain().await.unwrap_err();
        assert!(err.to_string().contains("Cleanup action 2 of 3 failed"));
        assert!(format!("{:#}", err).contains("plan still has subscriptions"));
        assert_eq!(*ran.lock().unwrap(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_unknown_resource_fails_at_drain() {
        let mut cleanup = registry();
        cleanup.delete_resource("widgets", "wid_1");
        let err = cleanup.drain().await.unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown resource: widgets"));
    }
}
