use std::sync::OnceLock;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Desktop-notification stub. Permission is asked for once; dispatching only
/// logs. Nothing in the poll loop calls it.
#[derive(Debug)]
pub struct Notifier {
    supported: bool,
    permission: OnceLock<Permission>,
}

impl Notifier {
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            permission: OnceLock::new(),
        }
    }

    pub fn request_permission(&self) -> Permission {
        *self.permission.get_or_init(|| {
            let permission = if self.supported {
                Permission::Granted
            } else {
                Permission::Denied
            };
            debug!(?permission, "notification permission resolved");
            permission
        })
    }

    pub fn permission(&self) -> Option<Permission> {
        self.permission.get().copied()
    }

    pub fn notify(&self, title: &str, body: &str) -> bool {
        if self.permission() != Some(Permission::Granted) {
            return false;
        }
        info!(title, body, "notification");
        true
    }
}
