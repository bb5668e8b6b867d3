//! Shared moderation state.

use linkguard_cache::MembershipObserver;
use linkguard_interface::ChatPlatform;
use linkguard_security::{AuthorizationResolver, LinkClassifier};
use linkguard_storage::ExemptionStore;
use std::sync::Arc;

/// Everything the moderation components read and mutate.
///
/// One context is built at startup and handed to each component. Cloning is
/// cheap and shares the underlying state.
pub struct ModerationContext<P: ChatPlatform + ?Sized> {
    /// Platform collaborator
    pub platform: Arc<P>,
    /// Privilege checks
    pub resolver: Arc<AuthorizationResolver<P>>,
    /// Per-chat exemptions
    pub exemptions: Arc<ExemptionStore>,
    /// Members seen posting
    pub observer: Arc<MembershipObserver>,
    /// Link detection
    pub classifier: LinkClassifier,
}

impl<P: ChatPlatform + ?Sized> ModerationContext<P> {
    /// Build a context; the resolver's owner is taken from the exemption store.
    pub fn new(
        platform: Arc<P>,
        exemptions: Arc<ExemptionStore>,
        observer: Arc<MembershipObserver>,
    ) -> Self {
        let resolver = Arc::new(AuthorizationResolver::new(
            Arc::clone(&platform),
            exemptions.owner(),
        ));
        Self {
            platform,
            resolver,
            exemptions,
            observer,
            classifier: LinkClassifier::new(),
        }
    }
}

impl<P: ChatPlatform + ?Sized> Clone for ModerationContext<P> {
    fn clone(&self) -> Self {
        Self {
            platform: Arc::clone(&self.platform),
            resolver: Arc::clone(&self.resolver),
            exemptions: Arc::clone(&self.exemptions),
            observer: Arc::clone(&self.observer),
            classifier: self.classifier.clone(),
        }
    }
}
