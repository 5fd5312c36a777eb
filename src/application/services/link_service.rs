//! Alias allocation, resolution and deletion.

use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;
use crate::utils::alias_generator::{
    AliasGenerator, DEFAULT_ALIAS_LENGTH, MAX_ALIAS_LENGTH, RandomAliasGenerator, is_reserved,
};
use crate::utils::url_normalizer::normalize_and_validate;
use serde_json::json;
use tracing::debug;

/// Candidates drawn at each alias length before moving to a longer one.
const ATTEMPTS_PER_LENGTH: usize = 10;

/// Longest alias the generation loop escalates to.
const MAX_GENERATED_ALIAS_LENGTH: usize = DEFAULT_ALIAS_LENGTH + 2;

/// A stored link together with its public short URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedUrl {
    pub link: ShortLink,
    pub short_url: String,
}

/// Service for creating, resolving and deleting short links.
///
/// Stateless apart from its collaborators; every uniqueness question is
/// answered by the repository.
pub struct LinkService<R: ShortLinkRepository + ?Sized> {
    repository: Arc<R>,
    alias_generator: Arc<dyn AliasGenerator>,
    base_url: String,
}

impl<R: ShortLinkRepository + ?Sized> LinkService<R> {
    /// Creates a link service drawing aliases from [`RandomAliasGenerator`].
    pub fn new(repository: Arc<R>, base_url: impl Into<String>) -> Self {
        Self::with_generator(repository, Arc::new(RandomAliasGenerator), base_url)
    }

    /// Creates a link service with a custom alias source.
    pub fn with_generator(
        repository: Arc<R>,
        alias_generator: Arc<dyn AliasGenerator>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            alias_generator,
            base_url: base_url.into(),
        }
    }

    /// Shortens a URL under a custom or generated alias.
    ///
    /// # Arguments
    ///
    /// - `original_url` - Raw URL text; normalized before anything else happens
    /// - `custom_alias` - Desired alias; absent or blank means generate one
    ///
    /// # Alias Generation
    ///
    /// Random aliases are 6 alphanumeric characters. A candidate is accepted once
    /// storage reports it unused and the insert succeeds. After 10 collisions the
    /// length grows by one character, up to 8.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if the URL fails normalization.
    ///
    /// Returns [`AppError::Validation`] if the custom alias is longer than 50 characters.
    ///
    /// Returns [`AppError::AliasAlreadyExists`] if the custom alias is taken or reserved.
    ///
    /// Returns [`AppError::Internal`] if no free alias was found or storage fails.
    pub async fn shorten(
        &self,
        original_url: Option<String>,
        custom_alias: Option<String>,
    ) -> Result<ShortenedUrl, AppError> {
        let normalized_url = normalize_and_validate(original_url.as_deref())?;

        let link = match custom_alias.filter(|alias| !alias.trim().is_empty()) {
            Some(alias) => self.save_custom_alias(alias, normalized_url).await?,
            None => self.save_generated_alias(normalized_url).await?,
        };

        Ok(self.with_short_url(link))
    }

    /// Returns every stored link in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_all_urls(&self) -> Result<Vec<ShortenedUrl>, AppError> {
        let links = self.repository.find_all().await?;

        Ok(links
            .into_iter()
            .map(|link| self.with_short_url(link))
            .collect())
    }

    /// Resolves an alias to its stored URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UrlNotFound`] if no link has this alias.
    pub async fn get_original_url(&self, alias: &str) -> Result<String, AppError> {
        self.repository
            .find_by_alias(alias)
            .await?
            .map(|link| link.original_url)
            .ok_or_else(|| AppError::UrlNotFound(alias.to_string()))
    }

    /// Deletes the link with this alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UrlNotFound`] if no link has this alias, including when a
    /// concurrent request deleted it between the existence check and the delete.
    pub async fn delete_by_alias(&self, alias: &str) -> Result<(), AppError> {
        if !self.repository.exists_by_alias(alias).await? {
            return Err(AppError::UrlNotFound(alias.to_string()));
        }

        if !self.repository.delete_by_alias(alias).await? {
            return Err(AppError::UrlNotFound(alias.to_string()));
        }

        Ok(())
    }

    /// Builds the public short URL for an alias.
    pub fn short_url(&self, alias: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), alias)
    }

    fn with_short_url(&self, link: ShortLink) -> ShortenedUrl {
        let short_url = self.short_url(&link.alias);
        ShortenedUrl { link, short_url }
    }

    async fn save_custom_alias(
        &self,
        alias: String,
        original_url: String,
    ) -> Result<ShortLink, AppError> {
        if alias.chars().count() > MAX_ALIAS_LENGTH {
            return Err(AppError::bad_request(
                format!("Alias must be at most {MAX_ALIAS_LENGTH} characters"),
                json!({ "alias": alias, "max": MAX_ALIAS_LENGTH }),
            ));
        }

        if is_reserved(&alias) || self.repository.exists_by_alias(&alias).await? {
            return Err(AppError::AliasAlreadyExists(alias));
        }

        // A concurrent insert of the same alias surfaces here as AliasAlreadyExists.
        self.repository
            .save(NewShortLink {
                alias,
                original_url,
            })
            .await
    }

    async fn save_generated_alias(&self, original_url: String) -> Result<ShortLink, AppError> {
        for length in DEFAULT_ALIAS_LENGTH..=MAX_GENERATED_ALIAS_LENGTH {
            for attempt in 1..=ATTEMPTS_PER_LENGTH {
                let alias = self.alias_generator.generate(length);

                if is_reserved(&alias) || self.repository.exists_by_alias(&alias).await? {
                    debug!(alias = %alias, attempt, "Generated alias already taken");
                    continue;
                }

                let new_link = NewShortLink {
                    alias,
                    original_url: original_url.clone(),
                };

                match self.repository.save(new_link).await {
                    Ok(link) => return Ok(link),
                    Err(AppError::AliasAlreadyExists(alias)) => {
                        debug!(alias = %alias, attempt, "Generated alias taken concurrently");
                    }
                    Err(e) => return Err(e),
                }
            }

            if length < MAX_GENERATED_ALIAS_LENGTH {
                debug!(length, "Escalating generated alias length");
            }
        }

        Err(AppError::internal(
            "Failed to generate unique alias",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockShortLinkRepository;
    use crate::utils::alias_generator::MockAliasGenerator;
    use chrono::Utc;
    use mockall::Sequence;

    const BASE_URL: &str = "http://localhost:8080";

    fn create_test_link(id: i64, alias: &str, url: &str) -> ShortLink {
        ShortLink::new(id, alias.to_string(), url.to_string(), Utc::now())
    }

    fn echo_save(repo: &mut MockShortLinkRepository) {
        repo.expect_save()
            .times(1)
            .returning(|new_link| Ok(create_test_link(1, &new_link.alias, &new_link.original_url)));
    }

    fn fixed_generator(aliases: &[&'static str]) -> MockAliasGenerator {
        let mut generator = MockAliasGenerator::new();
        let mut seq = Sequence::new();
        for &alias in aliases {
            generator
                .expect_generate()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| alias.to_string());
        }
        generator
    }

    #[tokio::test]
    async fn test_shorten_with_generated_alias() {
        let mut mock_repo = MockShortLinkRepository::new();

        mock_repo
            .expect_exists_by_alias()
            .withf(|alias| alias == "abc123")
            .times(1)
            .returning(|_| Ok(false));
        mock_repo
            .expect_save()
            .withf(|new_link| {
                new_link.alias == "abc123" && new_link.original_url == "https://google.com"
            })
            .times(1)
            .returning(|_| Ok(create_test_link(1, "abc123", "https://google.com")));

        let service = LinkService::with_generator(
            Arc::new(mock_repo),
            Arc::new(fixed_generator(&["abc123"])),
            BASE_URL,
        );

        let result = service
            .shorten(Some("https://google.com".to_string()), None)
            .await;

        assert!(result.is_ok());
        let shortened = result.unwrap();
        assert_eq!(shortened.link.alias, "abc123");
        assert_eq!(shortened.link.original_url, "https://google.com");
        assert_eq!(shortened.short_url, "http://localhost:8080/abc123");
    }

    #[tokio::test]
    async fn test_generated_alias_is_six_alphanumeric_characters() {
        let mut mock_repo = MockShortLinkRepository::new();

        mock_repo
            .expect_exists_by_alias()
            .withf(|alias| alias.len() == 6 && alias.chars().all(|c| c.is_ascii_alphanumeric()))
            .times(1)
            .returning(|_| Ok(false));
        echo_save(&mut mock_repo);

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let shortened = service
            .shorten(Some("https://example.com".to_string()), None)
            .await
            .unwrap();

        assert_eq!(shortened.link.alias.len(), 6);
        assert!(shortened.link.alias.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_shorten_normalizes_url_before_saving() {
        let mut mock_repo = MockShortLinkRepository::new();

        mock_repo.expect_exists_by_alias().returning(|_| Ok(false));
        mock_repo
            .expect_save()
            .withf(|new_link| new_link.original_url == "https://www.google.com")
            .times(1)
            .returning(|new_link| Ok(create_test_link(1, &new_link.alias, &new_link.original_url)));

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let result = service
            .shorten(Some("  www.google.com ".to_string()), None)
            .await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap().link.original_url, "https://www.google.com");
    }

    #[tokio::test]
    async fn test_shorten_invalid_url_touches_no_storage() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo.expect_exists_by_alias().times(0);
        mock_repo.expect_save().times(0);

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let result = service
            .shorten(Some("http://invalid_url".to_string()), Some("custom".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::InvalidUrl(ref m)) if m == "Invalid URL format"));
    }

    #[tokio::test]
    async fn test_shorten_missing_url() {
        let mock_repo = MockShortLinkRepository::new();
        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let result = service.shorten(None, None).await;

        assert!(matches!(result, Err(AppError::InvalidUrl(ref m)) if m == "URL cannot be empty"));
    }

    #[tokio::test]
    async fn test_shorten_with_custom_alias() {
        let mut mock_repo = MockShortLinkRepository::new();

        mock_repo
            .expect_exists_by_alias()
            .withf(|alias| alias == "custom123")
            .times(1)
            .returning(|_| Ok(false));
        mock_repo
            .expect_save()
            .withf(|new_link| new_link.alias == "custom123")
            .times(1)
            .returning(|_| Ok(create_test_link(2, "custom123", "https://example.com")));

        let mut generator = MockAliasGenerator::new();
        generator.expect_generate().times(0);

        let service =
            LinkService::with_generator(Arc::new(mock_repo), Arc::new(generator), BASE_URL);

        let shortened = service
            .shorten(
                Some("https://example.com".to_string()),
                Some("custom123".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(shortened.link.alias, "custom123");
        assert_eq!(shortened.short_url, "http://localhost:8080/custom123");
    }

    #[tokio::test]
    async fn test_custom_alias_is_used_verbatim() {
        let mut mock_repo = MockShortLinkRepository::new();

        mock_repo
            .expect_exists_by_alias()
            .withf(|alias| alias == "MiXeD-Case")
            .times(1)
            .returning(|_| Ok(false));
        echo_save(&mut mock_repo);

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let shortened = service
            .shorten(
                Some("https://example.com".to_string()),
                Some("MiXeD-Case".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(shortened.link.alias, "MiXeD-Case");
    }

    #[tokio::test]
    async fn test_custom_alias_conflict() {
        let mut mock_repo = MockShortLinkRepository::new();

        mock_repo
            .expect_exists_by_alias()
            .withf(|alias| alias == "existing-alias")
            .times(1)
            .returning(|_| Ok(true));
        mock_repo.expect_save().times(0);

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let result = service
            .shorten(
                Some("https://example.com".to_string()),
                Some("existing-alias".to_string()),
            )
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::AliasAlreadyExists(ref a) if a == "existing-alias"));
        assert!(err.to_string().contains("Alias already exists"));
    }

    #[tokio::test]
    async fn test_custom_alias_conflict_at_insert_time() {
        let mut mock_repo = MockShortLinkRepository::new();

        mock_repo.expect_exists_by_alias().times(1).returning(|_| Ok(false));
        mock_repo
            .expect_save()
            .times(1)
            .returning(|new_link| Err(AppError::AliasAlreadyExists(new_link.alias)));

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let result = service
            .shorten(
                Some("https://example.com".to_string()),
                Some("raced".to_string()),
            )
            .await;

        assert!(matches!(result, Err(AppError::AliasAlreadyExists(ref a)) if a == "raced"));
    }

    #[tokio::test]
    async fn test_reserved_custom_alias_rejected() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo.expect_exists_by_alias().times(0);
        mock_repo.expect_save().times(0);

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let result = service
            .shorten(
                Some("https://example.com".to_string()),
                Some("health".to_string()),
            )
            .await;

        assert!(matches!(result, Err(AppError::AliasAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_overlong_custom_alias_rejected_before_storage() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo.expect_exists_by_alias().times(0);
        mock_repo.expect_save().times(0);

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let result = service
            .shorten(Some("https://example.com".to_string()), Some("a".repeat(51)))
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_custom_alias_at_length_cap_accepted() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo.expect_exists_by_alias().times(1).returning(|_| Ok(false));
        echo_save(&mut mock_repo);

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let shortened = service
            .shorten(Some("https://example.com".to_string()), Some("a".repeat(50)))
            .await
            .unwrap();

        assert_eq!(shortened.link.alias.len(), 50);
    }

    #[tokio::test]
    async fn test_api_custom_alias_accepted() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo
            .expect_exists_by_alias()
            .withf(|alias| alias == "api")
            .times(1)
            .returning(|_| Ok(false));
        echo_save(&mut mock_repo);

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let shortened = service
            .shorten(
                Some("https://example.com".to_string()),
                Some("api".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(shortened.short_url, "http://localhost:8080/api");
    }

    #[tokio::test]
    async fn test_blank_custom_alias_generates_one() {
        let mut mock_repo = MockShortLinkRepository::new();

        mock_repo
            .expect_exists_by_alias()
            .withf(|alias| alias == "gen001")
            .times(1)
            .returning(|_| Ok(false));
        echo_save(&mut mock_repo);

        let service = LinkService::with_generator(
            Arc::new(mock_repo),
            Arc::new(fixed_generator(&["gen001"])),
            BASE_URL,
        );

        let shortened = service
            .shorten(Some("https://example.com".to_string()), Some("   ".to_string()))
            .await
            .unwrap();

        assert_eq!(shortened.link.alias, "gen001");
    }

    #[tokio::test]
    async fn test_generation_retries_on_collision() {
        let mut mock_repo = MockShortLinkRepository::new();

        mock_repo
            .expect_exists_by_alias()
            .withf(|alias| alias == "taken1")
            .times(2)
            .returning(|_| Ok(true));
        mock_repo
            .expect_exists_by_alias()
            .withf(|alias| alias == "free01")
            .times(1)
            .returning(|_| Ok(false));
        mock_repo
            .expect_save()
            .withf(|new_link| new_link.alias == "free01")
            .times(1)
            .returning(|new_link| Ok(create_test_link(3, &new_link.alias, &new_link.original_url)));

        let service = LinkService::with_generator(
            Arc::new(mock_repo),
            Arc::new(fixed_generator(&["taken1", "taken1", "free01"])),
            BASE_URL,
        );

        let shortened = service
            .shorten(Some("https://example.com".to_string()), None)
            .await
            .unwrap();

        assert_eq!(shortened.link.alias, "free01");
    }

    #[tokio::test]
    async fn test_generation_retries_when_insert_races() {
        let mut mock_repo = MockShortLinkRepository::new();
        let mut seq = Sequence::new();

        mock_repo.expect_exists_by_alias().times(2).returning(|_| Ok(false));
        mock_repo
            .expect_save()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| Err(AppError::AliasAlreadyExists(new_link.alias)));
        mock_repo
            .expect_save()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| Ok(create_test_link(4, &new_link.alias, &new_link.original_url)));

        let service = LinkService::with_generator(
            Arc::new(mock_repo),
            Arc::new(fixed_generator(&["race01", "race02"])),
            BASE_URL,
        );

        let shortened = service
            .shorten(Some("https://example.com".to_string()), None)
            .await
            .unwrap();

        assert_eq!(shortened.link.alias, "race02");
    }

    #[tokio::test]
    async fn test_generation_skips_reserved_candidates() {
        let mut mock_repo = MockShortLinkRepository::new();

        mock_repo
            .expect_exists_by_alias()
            .withf(|alias| alias == "ok1234")
            .times(1)
            .returning(|_| Ok(false));
        echo_save(&mut mock_repo);

        let service = LinkService::with_generator(
            Arc::new(mock_repo),
            Arc::new(fixed_generator(&["health", "ok1234"])),
            BASE_URL,
        );

        let shortened = service
            .shorten(Some("https://example.com".to_string()), None)
            .await
            .unwrap();

        assert_eq!(shortened.link.alias, "ok1234");
    }

    #[tokio::test]
    async fn test_generation_escalates_length_then_gives_up() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo
            .expect_exists_by_alias()
            .times(30)
            .returning(|_| Ok(true));
        mock_repo.expect_save().times(0);

        let mut generator = MockAliasGenerator::new();
        for length in 6..=8 {
            generator
                .expect_generate()
                .withf(move |len| *len == length)
                .times(10)
                .returning(|len| "x".repeat(len));
        }

        let service =
            LinkService::with_generator(Arc::new(mock_repo), Arc::new(generator), BASE_URL);

        let result = service
            .shorten(Some("https://example.com".to_string()), None)
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo
            .expect_exists_by_alias()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        mock_repo.expect_save().times(0);

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let result = service
            .shorten(Some("https://example.com".to_string()), None)
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_get_all_urls_keeps_storage_order() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo.expect_find_all().times(1).returning(|| {
            Ok(vec![
                create_test_link(2, "alias2", "https://two.example.com"),
                create_test_link(1, "alias1", "https://one.example.com"),
            ])
        });

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let urls = service.get_all_urls().await.unwrap();

        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].link.alias, "alias2");
        assert_eq!(urls[0].short_url, "http://localhost:8080/alias2");
        assert_eq!(urls[1].link.alias, "alias1");
    }

    #[tokio::test]
    async fn test_get_original_url() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo
            .expect_find_by_alias()
            .withf(|alias| alias == "validAlias")
            .times(1)
            .returning(|_| Ok(Some(create_test_link(1, "validAlias", "https://google.com"))));

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let result = service.get_original_url("validAlias").await;

        assert_eq!(result.unwrap(), "https://google.com");
    }

    #[tokio::test]
    async fn test_get_original_url_not_found() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo
            .expect_find_by_alias()
            .times(1)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let err = service.get_original_url("missingAlias").await.unwrap_err();

        assert!(matches!(err, AppError::UrlNotFound(ref a) if a == "missingAlias"));
        assert!(err.to_string().contains("URL not found"));
    }

    #[tokio::test]
    async fn test_delete_by_alias() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo
            .expect_exists_by_alias()
            .withf(|alias| alias == "aliasToDelete")
            .times(1)
            .returning(|_| Ok(true));
        mock_repo
            .expect_delete_by_alias()
            .withf(|alias| alias == "aliasToDelete")
            .times(1)
            .returning(|_| Ok(true));

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        assert!(service.delete_by_alias("aliasToDelete").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_alias() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo
            .expect_exists_by_alias()
            .times(1)
            .returning(|_| Ok(false));
        mock_repo.expect_delete_by_alias().times(0);

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let result = service.delete_by_alias("missingAlias").await;

        assert!(matches!(result, Err(AppError::UrlNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_lost_race_reports_not_found() {
        let mut mock_repo = MockShortLinkRepository::new();
        mock_repo
            .expect_exists_by_alias()
            .times(1)
            .returning(|_| Ok(true));
        mock_repo
            .expect_delete_by_alias()
            .times(1)
            .returning(|_| Ok(false));

        let service = LinkService::new(Arc::new(mock_repo), BASE_URL);

        let result = service.delete_by_alias("gone").await;

        assert!(matches!(result, Err(AppError::UrlNotFound(_))));
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = LinkService::new(Arc::new(MockShortLinkRepository::new()), "https://s.io/");
        assert_eq!(service.short_url("abc123"), "https://s.io/abc123");

        let service = LinkService::new(Arc::new(MockShortLinkRepository::new()), "https://s.io");
        assert_eq!(service.short_url("abc123"), "https://s.io/abc123");
    }
}
