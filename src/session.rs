//! Session cache for protected areas: holds the fetched principal and unread
//! notification count, and gates navigation entries by permission slug.

use crate::client::auth::{self, Principal};
use crate::client::notifications;
use crate::client::ApiClient;

/// Navigation entry rendered by the protected shell.
#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub href: String,
    pub label: String,
}

/// Admin sections and the permission slug each one requires.
const ADMIN_SECTIONS: [(&str, &str, &str); 4] = [
    ("admin.users.view", "/admin/users", "Users"),
    ("admin.roles.view", "/admin/roles", "Roles"),
    ("admin.permissions.view", "/admin/permissions", "Permissions"),
    ("admin.teams.view", "/admin/teams", "Teams"),
];

#[derive(Debug)]
pub struct Session {
    client: ApiClient,
    principal: Option<Principal>,
    unread_count: u64,
    error: Option<String>,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            principal: None,
            unread_count: 0,
            error: None,
        }
    }

    /// Fetch the principal and the first notifications page together. Any
    /// failure clears the principal and records the message; redirecting to
    /// login is the frontend's job.
    pub async fn load(&mut self) {
        let principal = auth::fetch_principal(&self.client);
        let notifications = notifications::fetch_notifications_page(&self.client, 1, 10);

        match futures::try_join!(principal, notifications) {
            Ok((principal, page)) => {
                self.principal = Some(principal);
                self.unread_count = page.unread_count;
                self.error = None;
            }
            Err(err) => {
                self.principal = None;
                self.unread_count = 0;
                self.error = Some(err.to_string());
            }
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn unread_count(&self) -> u64 {
        self.unread_count
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_permission(&self, slug: &str) -> bool {
        self.principal
            .as_ref()
            .map(|p| p.has_permission(slug))
            .unwrap_or(false)
    }

    /// Navigation entries visible to the current principal. Dashboard and
    /// notifications are always present; admin sections require their slug.
    pub fn nav_links(&self) -> Vec<NavLink> {
        match &self.principal {
            Some(principal) => nav_links_for(principal, self.unread_count),
            None => Vec::new(),
        }
    }
}

/// Pure gating logic, split out so it is testable without a client.
pub fn nav_links_for(principal: &Principal, unread_count: u64) -> Vec<NavLink> {
    let mut links = vec![
        NavLink {
            href: "/dashboard".to_string(),
            label: "Dashboard".to_string(),
        },
        NavLink {
            href: "/notifications".to_string(),
            label: format!("Notifications ({unread_count})"),
        },
    ];

    for (slug, href, label) in ADMIN_SECTIONS {
        if principal.has_permission(slug) {
            links.push(NavLink {
                href: href.to_string(),
                label: label.to_string(),
            });
        }
    }

    links
}
