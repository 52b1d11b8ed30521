//! News handler: topic extraction, search, and reply formatting.

use std::future::Future;
use std::sync::Arc;

use switchboard_types::error::{HandlerError, ServiceError};
use switchboard_types::llm::CompletionRequest;
use switchboard_types::news::Article;

use super::{Handler, HandlerRequest};
use crate::fallback::or_default;
use crate::llm::box_provider::BoxLlmProvider;

/// Topic used when the text model cannot produce one.
pub const FALLBACK_TOPIC: &str = "latest news";

/// Service name used in authentication-failure replies.
pub const NEWSAPI: &str = "NewsAPI";

/// At most this many articles are shown in a reply.
pub const MAX_ARTICLES: usize = 3;

/// Port for a news search backend. Implemented by `NewsApiClient` in infra.
pub trait NewsSource: Send + Sync {
    /// Most recent articles matching `query`, newest first.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Article>, ServiceError>> + Send;
}

/// Render articles under a topic header, or the "nothing found" line.
pub fn format_news_reply(articles: &[Article], topic: &str) -> String {
    if articles.is_empty() {
        return format!("Sorry, I couldn't find recent news on **{topic}**.");
    }

    let mut reply = format!("🗞️ Top news for **{topic}**:\n\n");
    for article in articles.iter().take(MAX_ARTICLES) {
        reply.push_str(&format!(
            "• [{}]({}) — {} ({})\n",
            article.title, article.url, article.source, article.published
        ));
    }
    reply
}

pub struct NewsHandler<S> {
    llm: Arc<BoxLlmProvider>,
    source: S,
    fallback_topic: String,
}

impl<S: NewsSource> NewsHandler<S> {
    pub fn new(llm: Arc<BoxLlmProvider>, source: S) -> Self {
        Self {
            llm,
            source,
            fallback_topic: FALLBACK_TOPIC.to_string(),
        }
    }

    pub fn with_fallback_topic(mut self, topic: impl Into<String>) -> Self {
        self.fallback_topic = topic.into();
        self
    }

    /// A 3-5 word search phrase for `text`, or the fallback topic.
    async fn extract_topic(&self, text: &str) -> String {
        let prompt = format!(
            "You are a smart assistant.\n\
             Task: Given a request, return only a 3-5 word search phrase related to news. \
             Don't explain. No label, just the phrase.\n\
             Request: {text}\n\
             Search Phrase:"
        );
        let request = CompletionRequest::prompt(prompt, 20).with_temperature(0.2);

        let topic = or_default(
            "news topic",
            self.llm.complete(&request).await.map(|r| clean_topic(&r.content)),
            String::new,
        );
        if topic.is_empty() {
            self.fallback_topic.clone()
        } else {
            topic
        }
    }
}

/// First line of the answer without quotes or a trailing period.
fn clean_topic(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '.')
        .trim()
        .to_string()
}

impl<S: NewsSource> Handler for NewsHandler<S> {
    fn name(&self) -> &'static str {
        "news"
    }

    #[tracing::instrument(name = "news_handler", skip_all, fields(user_id = %request.user_id))]
    async fn handle(&self, request: &HandlerRequest) -> Result<String, HandlerError> {
        let topic = self.extract_topic(&request.text).await;
        tracing::info!(%topic, "searching news");

        let articles = match self.source.search(&topic).await {
            Err(e @ (ServiceError::AuthenticationFailed | ServiceError::NotConfigured(_))) => {
                return Err(HandlerError::from_service(NEWSAPI, e));
            }
            result => or_default("news search", result, Vec::new),
        };
        Ok(format_news_reply(&articles, &topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::testing::StubLlm;

    struct StubNews {
        result: Result<Vec<Article>, fn() -> ServiceError>,
        queries: Arc<Mutex<Vec<String>>>,
    }

    impl StubNews {
        fn returning(articles: Vec<Article>) -> Self {
            Self {
                result: Ok(articles),
                queries: Arc::default(),
            }
        }

        fn failing() -> Self {
            Self::failing_with(|| ServiceError::Http("connection refused".to_string()))
        }

        fn failing_with(error: fn() -> ServiceError) -> Self {
            Self {
                result: Err(error),
                queries: Arc::default(),
            }
        }
    }

    impl NewsSource for StubNews {
        async fn search(&self, query: &str) -> Result<Vec<Article>, ServiceError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.result.clone().map_err(|error| error())
        }
    }

    fn article(title: &str, day: u32) -> Article {
        Article {
            title: title.to_string(),
            url: format!("https://example.com/{day}"),
            source: "Example Times".to_string(),
            published: format!("2024-06-{day:02}"),
        }
    }

    #[test]
    fn test_format_reply() {
        let reply = format_news_reply(&[article("Chips get faster", 1)], "AI chips");
        assert_eq!(
            reply,
            "🗞️ Top news for **AI chips**:\n\n\
             • [Chips get faster](https://example.com/1) — Example Times (2024-06-01)\n"
        );
    }

    #[test]
    fn test_format_reply_caps_articles() {
        let articles: Vec<_> = (1..=5).map(|d| article("t", d)).collect();
        let reply = format_news_reply(&articles, "x");
        assert_eq!(reply.matches('•').count(), MAX_ARTICLES);
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(
            format_news_reply(&[], "quantum"),
            "Sorry, I couldn't find recent news on **quantum**."
        );
    }

    #[test]
    fn test_clean_topic() {
        assert_eq!(clean_topic("  \"AI chip market\".\nextra"), "AI chip market");
        assert_eq!(clean_topic("\n\n"), "");
    }

    #[tokio::test]
    async fn test_tech_news() {
        let source = StubNews::returning(vec![article("New GPUs", 2), article("Chip war", 1)]);
        let queries = Arc::clone(&source.queries);
        let handler = NewsHandler::new(
            StubLlm::new().reply("Search Phrase", "latest technology news").boxed(),
            source,
        );

        let reply = handler
            .handle(&HandlerRequest::new("u1", "what's new in tech?"))
            .await
            .unwrap();

        assert!(reply.starts_with("🗞️ Top news for **latest technology news**:"));
        assert!(reply.contains("[New GPUs](https://example.com/2)"));
        assert_eq!(*queries.lock().unwrap(), vec!["latest technology news"]);
    }

    #[tokio::test]
    async fn test_topic_falls_back_on_model_failure() {
        let source = StubNews::returning(vec![]);
        let queries = Arc::clone(&source.queries);
        let handler = NewsHandler::new(StubLlm::new().fail("Search Phrase").boxed(), source);

        let reply = handler.handle(&HandlerRequest::new("u1", "news")).await.unwrap();
        assert_eq!(reply, "Sorry, I couldn't find recent news on **latest news**.");
        assert_eq!(*queries.lock().unwrap(), vec!["latest news"]);
    }

    #[tokio::test]
    async fn test_topic_falls_back_on_empty_output() {
        let handler = NewsHandler::new(
            StubLlm::new().reply("Search Phrase", "   ").boxed(),
            StubNews::returning(vec![]),
        )
        .with_fallback_topic("headlines");

        let reply = handler.handle(&HandlerRequest::new("u1", "news")).await.unwrap();
        assert!(reply.contains("**headlines**"));
    }

    #[tokio::test]
    async fn test_search_failure_counts_as_no_results() {
        let handler = NewsHandler::new(
            StubLlm::new().reply("Search Phrase", "mars rover").boxed(),
            StubNews::failing(),
        );
        let reply = handler.handle(&HandlerRequest::new("u1", "mars")).await.unwrap();
        assert_eq!(reply, "Sorry, I couldn't find recent news on **mars rover**.");
    }

    #[tokio::test]
    async fn test_missing_key_is_an_auth_failure() {
        let handler = NewsHandler::new(
            StubLlm::new().reply("Search Phrase", "tech news").boxed(),
            StubNews::failing_with(|| ServiceError::NotConfigured("NewsAPI")),
        );
        let err = handler
            .handle(&HandlerRequest::new("u1", "what's happening in tech today"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HandlerError::AuthenticationFailed { service: NEWSAPI }
        ));
    }

    #[tokio::test]
    async fn test_rejected_key_is_an_auth_failure() {
        let handler = NewsHandler::new(
            StubLlm::new().reply("Search Phrase", "tech news").boxed(),
            StubNews::failing_with(|| ServiceError::AuthenticationFailed),
        );
        let err = handler.handle(&HandlerRequest::new("u1", "tech")).await.unwrap_err();
        assert!(matches!(err, HandlerError::AuthenticationFailed { .. }));
    }
}
