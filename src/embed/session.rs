//! A mounted player
//!
//! Mounting resolves the URL and installs the player's global listeners.
//! Dropping the session uninstalls them before control returns.

use super::{EmbedProviders, EmbedTarget, GlobalListener, ListenerGuard, ListenerRegistry};

#[derive(Debug)]
pub struct EmbedSession {
    target: EmbedTarget,
    url: String,
    iframe: String,
    _guards: Vec<ListenerGuard>,
}

impl EmbedSession {
    pub fn mount(
        target: EmbedTarget,
        providers: &EmbedProviders,
        listeners: &ListenerRegistry,
    ) -> Self {
        tracing::debug!(%target, "mounting player");
        Self {
            target,
            url: providers.url(&target),
            iframe: providers.iframe_html(&target),
            _guards: GlobalListener::PLAYER
                .iter()
                .map(|l| listeners.register(*l))
                .collect(),
        }
    }

    pub fn target(&self) -> &EmbedTarget {
        &self.target
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn iframe_html(&self) -> &str {
        &self.iframe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_registers_and_drop_releases() {
        let listeners = ListenerRegistry::new();
        let session = EmbedSession::mount(
            EmbedTarget::Movie { id: 550 },
            &EmbedProviders::default(),
            &listeners,
        );

        assert_eq!(session.url(), "https://vidlink.pro/movie/550?nextbutton=true");
        assert!(session.iframe_html().contains(session.url()));
        assert!(listeners.is_active(GlobalListener::ContextMenu));
        assert!(listeners.is_active(GlobalListener::ClickCapture));

        drop(session);
        assert_eq!(listeners.active_count(), 0);
    }

    #[test]
    fn test_remount_keeps_single_registration() {
        let listeners = ListenerRegistry::new();
        let providers = EmbedProviders::default();
        let target = |episode| EmbedTarget::Episode {
            tv_id: 1,
            season: 1,
            episode,
        };

        let mut session = EmbedSession::mount(target(1), &providers, &listeners);
        assert_eq!(session.target(), &target(1));
        session = EmbedSession::mount(target(2), &providers, &listeners);

        assert_eq!(session.target(), &target(2));
        assert_eq!(listeners.active_count(), 2);
    }
}
