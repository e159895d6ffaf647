use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::error::{Error, TintaResult};
use crate::tokenization::TokenizationSupport;

type PendingSupport = Shared<BoxFuture<'static, Option<Arc<dyn TokenizationSupport>>>>;

#[derive(Clone)]
enum Provider {
    Ready(Arc<dyn TokenizationSupport>),
    /// `registration` identifies the deferred registration, so a late resolution does
    /// not clobber a newer registration for the same language.
    Pending {
        registration: u64,
        support: PendingSupport,
    },
}

/// Result of a non-blocking provider lookup
#[derive(Clone)]
pub enum Lookup {
    Ready(Arc<dyn TokenizationSupport>),
    /// A deferred registration exists but has not resolved yet
    Pending,
    /// Nothing registered for that language
    Missing,
}

impl fmt::Debug for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Ready(_) => write!(f, "Lookup::Ready"),
            Lookup::Pending => write!(f, "Lookup::Pending"),
            Lookup::Missing => write!(f, "Lookup::Missing"),
        }
    }
}

/// Tokenization providers by language name.
///
/// Reads never block each other. A provider can be registered right away or as a future
/// resolving to it; the latter is installed the first time anyone observes its
/// resolution, either through [`TokenizationRegistry::get`] or by awaiting it with
/// [`TokenizationRegistry::get_or_wait`].
pub struct TokenizationRegistry {
    providers: papaya::HashMap<String, Provider>,
    next_registration: AtomicU64,
}

impl Default for TokenizationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenizationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let providers = self.providers.pin();
        let mut languages: Vec<_> = providers
            .iter()
            .map(|(language, provider)| {
                let status = match provider {
                    Provider::Ready(_) => "ready",
                    Provider::Pending { .. } => "pending",
                };
                (language.as_str(), status)
            })
            .collect();
        languages.sort_unstable();
        f.debug_struct("TokenizationRegistry")
            .field("providers", &languages)
            .finish()
    }
}

impl TokenizationRegistry {
    pub fn new() -> Self {
        Self {
            providers: papaya::HashMap::new(),
            next_registration: AtomicU64::new(0),
        }
    }

    /// Registers a provider that is available right away, replacing any previous one.
    pub fn register(&self, language: &str, support: Arc<dyn TokenizationSupport>) {
        log::debug!("[register] tokenization provider for {language:?}");
        self.providers
            .pin()
            .insert(language.to_owned(), Provider::Ready(support));
    }

    /// Registers a provider that will only exist once `future` resolves.
    ///
    /// Registration itself succeeds immediately. A future resolving to `None` removes
    /// the registration.
    pub fn register_deferred<F>(&self, language: &str, future: F)
    where
        F: Future<Output = Option<Arc<dyn TokenizationSupport>>> + Send + 'static,
    {
        let registration = self.next_registration.fetch_add(1, Ordering::Relaxed);
        log::debug!("[register_deferred] provider #{registration} for {language:?}");
        let support = future.boxed().shared();
        self.providers.pin().insert(
            language.to_owned(),
            Provider::Pending {
                registration,
                support,
            },
        );
    }

    /// Removes whatever is registered for the language.
    pub fn unregister(&self, language: &str) -> bool {
        self.providers.pin().remove(language).is_some()
    }

    /// Whether anything, ready or pending, is registered for the language
    pub fn contains(&self, language: &str) -> bool {
        self.providers.pin().contains_key(language)
    }

    /// Non-blocking lookup.
    ///
    /// A pending provider whose future has already completed is installed and returned.
    pub fn get(&self, language: &str) -> Lookup {
        let provider = self.providers.pin().get(language).cloned();
        match provider {
            None => Lookup::Missing,
            Some(Provider::Ready(support)) => Lookup::Ready(support),
            Some(Provider::Pending {
                registration,
                support,
            }) => match support.now_or_never() {
                None => Lookup::Pending,
                Some(resolved) => match self.settle(language, registration, resolved) {
                    Some(support) => Lookup::Ready(support),
                    None => Lookup::Missing,
                },
            },
        }
    }

    /// Returns the provider, waiting for a pending registration to resolve.
    ///
    /// Errors with [`Error::NoProvider`] right away if nothing is registered, or once a
    /// pending registration resolves to nothing.
    pub async fn get_or_wait(&self, language: &str) -> TintaResult<Arc<dyn TokenizationSupport>> {
        let provider = self.providers.pin().get(language).cloned();
        match provider {
            None => Err(Error::NoProvider(language.to_owned())),
            Some(Provider::Ready(support)) => Ok(support),
            Some(Provider::Pending {
                registration,
                support,
            }) => {
                log::debug!("[get_or_wait] waiting for provider #{registration} of {language:?}");
                let resolved = support.await;
                self.settle(language, registration, resolved)
                    .ok_or_else(|| Error::NoProvider(language.to_owned()))
            }
        }
    }

    /// Installs (or drops) a resolved deferred registration, unless the language has
    /// been re-registered in the meantime.
    fn settle(
        &self,
        language: &str,
        registration: u64,
        resolved: Option<Arc<dyn TokenizationSupport>>,
    ) -> Option<Arc<dyn TokenizationSupport>> {
        let providers = self.providers.pin();
        let still_pending = matches!(
            providers.get(language),
            Some(Provider::Pending { registration: current, .. }) if *current == registration
        );

        if still_pending {
            match &resolved {
                Some(support) => {
                    log::debug!("[settle] installing provider #{registration} for {language:?}");
                    providers.insert(language.to_owned(), Provider::Ready(Arc::clone(support)));
                }
                None => {
                    log::debug!("[settle] provider #{registration} for {language:?} resolved to nothing");
                    providers.remove(language);
                }
            }
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenization::PlainTokenization;
    use futures::channel::oneshot;

    fn plain() -> Arc<dyn TokenizationSupport> {
        Arc::new(PlainTokenization::default())
    }

    #[test]
    fn immediate_registration_is_ready() {
        let registry = TokenizationRegistry::new();
        assert!(matches!(registry.get("rust"), Lookup::Missing));
        registry.register("rust", plain());
        assert!(registry.contains("rust"));
        assert!(matches!(registry.get("rust"), Lookup::Ready(_)));

        assert!(registry.unregister("rust"));
        assert!(!registry.unregister("rust"));
        assert!(matches!(registry.get("rust"), Lookup::Missing));
    }

    #[test]
    fn missing_provider_fails_without_waiting() {
        let registry = TokenizationRegistry::new();
        let err = pollster::block_on(registry.get_or_wait("nope")).err().unwrap();
        assert!(matches!(err, Error::NoProvider(language) if language == "nope"));
    }

    #[test]
    fn deferred_registration_is_pending_until_resolved() {
        let registry = TokenizationRegistry::new();
        let (tx, rx) = oneshot::channel::<Arc<dyn TokenizationSupport>>();
        registry.register_deferred("rust", rx.map(Result::ok));

        assert!(registry.contains("rust"));
        assert!(matches!(registry.get("rust"), Lookup::Pending));

        tx.send(plain()).ok().unwrap();
        // the resolution is observed by a plain lookup
        assert!(matches!(registry.get("rust"), Lookup::Ready(_)));
        assert!(pollster::block_on(registry.get_or_wait("rust")).is_ok());
    }

    #[test]
    fn waiting_installs_the_deferred_provider() {
        let registry = TokenizationRegistry::new();
        let (tx, rx) = oneshot::channel::<Arc<dyn TokenizationSupport>>();
        registry.register_deferred("rust", rx.map(Result::ok));

        let waited = pollster::block_on(async {
            let wait = registry.get_or_wait("rust");
            futures::pin_mut!(wait);
            assert!(futures::poll!(&mut wait).is_pending());
            tx.send(plain()).ok().unwrap();
            wait.await
        });
        assert!(waited.is_ok());
        assert!(matches!(registry.get("rust"), Lookup::Ready(_)));
    }

    #[test]
    fn deferred_resolving_to_nothing_removes_registration() {
        let registry = TokenizationRegistry::new();
        let (tx, rx) = oneshot::channel::<Arc<dyn TokenizationSupport>>();
        registry.register_deferred("rust", rx.map(Result::ok));
        drop(tx);

        let err = pollster::block_on(registry.get_or_wait("rust")).err().unwrap();
        assert!(matches!(err, Error::NoProvider(_)));
        assert!(!registry.contains("rust"));
    }

    #[test]
    fn late_resolution_does_not_replace_newer_registration() {
        let registry = TokenizationRegistry::new();
        let (tx, rx) = oneshot::channel::<Arc<dyn TokenizationSupport>>();
        registry.register_deferred("rust", rx.map(Result::ok));
        let (_tx2, rx2) = oneshot::channel::<Arc<dyn TokenizationSupport>>();
        registry.register_deferred("rust", rx2.map(Result::ok));

        tx.send(plain()).ok().unwrap();
        assert!(matches!(registry.get("rust"), Lookup::Pending));
    }
}
