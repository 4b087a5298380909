//! Offline provider that answers with canned quotes

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use taleweave_application::{ProviderError, ProviderKind, StoryProvider};
use taleweave_domain::Agent;
use taleweave_domain::scenario::QuoteTable;
use tracing::debug;

pub const DEFAULT_FALLBACK: &str = "I'm not sure how to respond.";

/// Sleeps a random delay, then returns a random quote for the agent's name.
///
/// Agents missing from the quote table get the fallback line. Never fails.
pub struct MockProvider {
    quotes: QuoteTable,
    fallback: String,
    min_delay_ms: u64,
    max_delay_ms: u64,
    rng: Mutex<StdRng>,
}

impl MockProvider {
    pub fn new(quotes: QuoteTable) -> Self {
        Self {
            quotes,
            fallback: DEFAULT_FALLBACK.to_string(),
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Delay bounds in milliseconds; an inverted pair is reordered.
    pub fn with_delay_ms(mut self, min: u64, max: u64) -> Self {
        self.min_delay_ms = min.min(max);
        self.max_delay_ms = min.max(max);
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    fn pick(&self, agent: &Agent) -> (Duration, String) {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let delay = Duration::from_millis(rng.gen_range(self.min_delay_ms..=self.max_delay_ms));
        let line = self
            .quotes
            .get(&agent.name)
            .and_then(|lines| lines.choose(&mut *rng))
            .unwrap_or(&self.fallback)
            .clone();
        (delay, line)
    }
}

#[async_trait]
impl StoryProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Mock
    }

    async fn generate(&self, _prompt: &str, agent: &Agent) -> Result<String, ProviderError> {
        let (delay, line) = self.pick(agent);
        debug!("Mock reply for {} after {:?}", agent.name, delay);
        tokio::time::sleep(delay).await;
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use taleweave_domain::Scenario;

    fn provider() -> MockProvider {
        MockProvider::new(Scenario::eldermoor().quotes)
            .with_delay_ms(0, 1)
            .with_seed(11)
    }

    #[tokio::test]
    async fn test_returns_quote_for_known_agent() {
        let quotes = Scenario::eldermoor().quotes;
        let provider = provider();
        let elara = Agent::new("agent_1", "Elara", "Elven Mage", "Wise.");

        let mut seen = HashSet::new();
        for _ in 0..50 {
            let line = provider.generate("ignored", &elara).await.unwrap();
            assert!(quotes["Elara"].contains(&line));
            seen.insert(line);
        }
        assert!(seen.len() > 1);
    }

    #[tokio::test]
    async fn test_unknown_agent_gets_fallback() {
        let provider = provider();
        let stranger = Agent::new("x", "Stranger", "Wanderer", "Quiet.");
        assert_eq!(
            provider.generate("", &stranger).await.unwrap(),
            "I'm not sure how to respond."
        );

        let provider = provider.with_fallback("...");
        assert_eq!(provider.generate("", &stranger).await.unwrap(), "...");
    }

    #[tokio::test]
    async fn test_empty_quote_list_gets_fallback() {
        let mut quotes = QuoteTable::new();
        quotes.insert("Elara".to_string(), vec![]);
        let provider = MockProvider::new(quotes).with_delay_ms(0, 0);
        let elara = Agent::new("agent_1", "Elara", "Elven Mage", "Wise.");
        assert_eq!(
            provider.generate("", &elara).await.unwrap(),
            DEFAULT_FALLBACK
        );
    }

    #[test]
    fn test_delay_within_bounds() {
        let provider = MockProvider::new(QuoteTable::new())
            .with_delay_ms(30, 10)
            .with_seed(1);
        let agent = Agent::new("a", "A", "r", "p");
        for _ in 0..100 {
            let (delay, _) = provider.pick(&agent);
            assert!(delay >= Duration::from_millis(10));
            assert!(delay <= Duration::from_millis(30));
        }
    }
}
