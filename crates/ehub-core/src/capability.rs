// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Capability definitions and the role policy table.
//!
//! Capabilities are the only vocabulary guards and business logic use to ask
//! "may this member do X". Each one is a pure, total predicate over an
//! optional [`Role`]: an absent or unrecognised role is granted nothing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::role::Role;

// =============================================================================
// Capability
// =============================================================================

/// A named capability derived from a member's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    // =========================================================================
    // Content
    // =========================================================================
    /// Write blog posts.
    CanCreateBlogPosts,
    /// Remove blog posts written by other members.
    CanDeleteOthersBlogPosts,
    /// Remove community posts written by other members.
    CanDeleteOthersCommunityPosts,
    /// Publish entries in the resource library.
    CanPublishResources,
    /// Remove resources published by other members.
    CanDeleteOthersResources,

    // =========================================================================
    // Accounts
    // =========================================================================
    /// Delete member accounts.
    CanDeleteUsers,
    /// Assign roles to members.
    CanAssignRoles,

    // =========================================================================
    // Professional
    // =========================================================================
    /// Offer training sessions.
    CanGiveTraining,

    // =========================================================================
    // Classification
    // =========================================================================
    /// Holds moderation rights.
    IsModerator,
}

impl Capability {
    /// Returns the capability name as exposed to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::CanCreateBlogPosts => "canCreateBlogPosts",
            Capability::CanDeleteOthersBlogPosts => "canDeleteOthersBlogPosts",
            Capability::CanDeleteOthersCommunityPosts => "canDeleteOthersCommunityPosts",
            Capability::CanPublishResources => "canPublishResources",
            Capability::CanDeleteOthersResources => "canDeleteOthersResources",
            Capability::CanDeleteUsers => "canDeleteUsers",
            Capability::CanAssignRoles => "canAssignRoles",
            Capability::CanGiveTraining => "canGiveTraining",
            Capability::IsModerator => "isModerator",
        }
    }

    /// Parses a capability from its client-facing name.
    pub fn parse(s: &str) -> Option<Self> {
        Capability::all().iter().copied().find(|c| c.as_str() == s)
    }

    /// Returns all capabilities.
    pub fn all() -> &'static [Capability] {
        &[
            Capability::CanCreateBlogPosts,
            Capability::CanDeleteOthersBlogPosts,
            Capability::CanDeleteOthersCommunityPosts,
            Capability::CanPublishResources,
            Capability::CanDeleteOthersResources,
            Capability::CanDeleteUsers,
            Capability::CanAssignRoles,
            Capability::CanGiveTraining,
            Capability::IsModerator,
        ]
    }

    /// Returns the roles this capability is granted to.
    pub fn granted_to(&self) -> &'static [Role] {
        use Role::*;

        match self {
            Capability::CanCreateBlogPosts => &[Engineer, Company, Admin],
            Capability::CanDeleteOthersBlogPosts => &[Admin, Moderator],
            Capability::CanDeleteOthersCommunityPosts => &[Admin, Moderator],
            Capability::CanPublishResources => &[Technician, Engineer, Company, Admin],
            Capability::CanDeleteOthersResources => &[Admin, Moderator],
            Capability::CanDeleteUsers => &[Admin],
            Capability::CanAssignRoles => &[Admin],
            Capability::CanGiveTraining => &[Engineer, Company, Admin],
            Capability::IsModerator => &[Moderator, Admin],
        }
    }

    /// Returns `true` if the given role holds this capability.
    ///
    /// `None` stands for an absent or unrecognised role and is never granted
    /// anything.
    pub fn allows(&self, role: Option<Role>) -> bool {
        role.is_some_and(|role| self.granted_to().contains(&role))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Registry predicates
// =============================================================================

/// Whether the role may write blog posts.
pub fn can_create_blog_posts(role: Option<Role>) -> bool {
    Capability::CanCreateBlogPosts.allows(role)
}

/// Whether the role may remove other members' blog posts.
pub fn can_delete_others_blog_posts(role: Option<Role>) -> bool {
    Capability::CanDeleteOthersBlogPosts.allows(role)
}

/// Whether the role may remove other members' community posts.
pub fn can_delete_others_community_posts(role: Option<Role>) -> bool {
    Capability::CanDeleteOthersCommunityPosts.allows(role)
}

/// Whether the role may publish resources.
pub fn can_publish_resources(role: Option<Role>) -> bool {
    Capability::CanPublishResources.allows(role)
}

/// Whether the role may remove other members' resources.
pub fn can_delete_others_resources(role: Option<Role>) -> bool {
    Capability::CanDeleteOthersResources.allows(role)
}

/// Whether the role may delete member accounts.
pub fn can_delete_users(role: Option<Role>) -> bool {
    Capability::CanDeleteUsers.allows(role)
}

/// Whether the role may assign roles.
pub fn can_assign_roles(role: Option<Role>) -> bool {
    Capability::CanAssignRoles.allows(role)
}

/// Whether the role may offer training.
pub fn can_give_training(role: Option<Role>) -> bool {
    Capability::CanGiveTraining.allows(role)
}

/// Whether the role holds moderation rights.
pub fn is_moderator(role: Option<Role>) -> bool {
    Capability::IsModerator.allows(role)
}

/// Whether the role is the administrator role.
pub fn is_admin(role: Option<Role>) -> bool {
    role.is_some_and(|r| r.is_admin())
}

// =============================================================================
// Permission Set
// =============================================================================

/// The capabilities of one role, resolved into named flags.
///
/// A `PermissionSet` is never stored. It is derived from a role on every
/// access, so it cannot drift from the policy table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    /// See [`Capability::CanCreateBlogPosts`].
    pub can_create_blog_posts: bool,
    /// See [`Capability::CanDeleteOthersBlogPosts`].
    pub can_delete_others_blog_posts: bool,
    /// See [`Capability::CanDeleteOthersCommunityPosts`].
    pub can_delete_others_community_posts: bool,
    /// See [`Capability::CanPublishResources`].
    pub can_publish_resources: bool,
    /// See [`Capability::CanDeleteOthersResources`].
    pub can_delete_others_resources: bool,
    /// See [`Capability::CanDeleteUsers`].
    pub can_delete_users: bool,
    /// See [`Capability::CanAssignRoles`].
    pub can_assign_roles: bool,
    /// See [`Capability::CanGiveTraining`].
    pub can_give_training: bool,
    /// See [`Capability::IsModerator`].
    pub is_moderator: bool,
}

impl PermissionSet {
    /// Resolves the permission set for a role.
    pub fn for_role(role: Option<Role>) -> Self {
        Self {
            can_create_blog_posts: can_create_blog_posts(role),
            can_delete_others_blog_posts: can_delete_others_blog_posts(role),
            can_delete_others_community_posts: can_delete_others_community_posts(role),
            can_publish_resources: can_publish_resources(role),
            can_delete_others_resources: can_delete_others_resources(role),
            can_delete_users: can_delete_users(role),
            can_assign_roles: can_assign_roles(role),
            can_give_training: can_give_training(role),
            is_moderator: is_moderator(role),
        }
    }

    /// The empty set: every capability denied.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns `true` if the set grants the capability.
    pub fn contains(&self, capability: Capability) -> bool {
        match capability {
            Capability::CanCreateBlogPosts => self.can_create_blog_posts,
            Capability::CanDeleteOthersBlogPosts => self.can_delete_others_blog_posts,
            Capability::CanDeleteOthersCommunityPosts => self.can_delete_others_community_posts,
            Capability::CanPublishResources => self.can_publish_resources,
            Capability::CanDeleteOthersResources => self.can_delete_others_resources,
            Capability::CanDeleteUsers => self.can_delete_users,
            Capability::CanAssignRoles => self.can_assign_roles,
            Capability::CanGiveTraining => self.can_give_training,
            Capability::IsModerator => self.is_moderator,
        }
    }

    /// Returns `true` if the set grants every listed capability.
    pub fn contains_all(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|c| self.contains(*c))
    }

    /// Returns `true` if the set grants at least one listed capability.
    pub fn contains_any(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().any(|c| self.contains(*c))
    }

    /// Returns the granted capabilities.
    pub fn granted(&self) -> Vec<Capability> {
        Capability::all()
            .iter()
            .copied()
            .filter(|c| self.contains(*c))
            .collect()
    }

    /// Returns `true` if nothing is granted.
    pub fn is_empty(&self) -> bool {
        self.granted().is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        let blog = PermissionSet::for_role(Some(Role::Engineer));
        assert!(blog.can_create_blog_posts);
        assert!(blog.can_give_training);
        assert!(blog.can_publish_resources);
        assert!(!blog.can_delete_users);
        assert!(!blog.is_moderator);

        let tech = PermissionSet::for_role(Some(Role::Technician));
        assert!(tech.can_publish_resources);
        assert!(!tech.can_create_blog_posts);
        assert!(!tech.can_give_training);

        let vendor = PermissionSet::for_role(Some(Role::Vendor));
        assert!(vendor.is_empty());

        let moderator = PermissionSet::for_role(Some(Role::Moderator));
        assert!(moderator.can_delete_others_blog_posts);
        assert!(moderator.can_delete_others_community_posts);
        assert!(moderator.can_delete_others_resources);
        assert!(!moderator.can_delete_users);
        assert!(!moderator.can_create_blog_posts);
    }

    #[test]
    fn test_admin_holds_everything() {
        let admin = PermissionSet::for_role(Some(Role::Admin));
        assert!(admin.contains_all(Capability::all()));
    }

    #[test]
    fn test_absent_role_is_least_privilege() {
        for capability in Capability::all() {
            assert!(!capability.allows(None), "{} granted to no role", capability);
        }
        assert!(PermissionSet::for_role(None).is_empty());
        assert!(!is_admin(None));
    }

    #[test]
    fn test_is_moderator_predicate() {
        for role in Role::all() {
            let expected = matches!(role, Role::Moderator | Role::Admin);
            assert_eq!(is_moderator(Some(*role)), expected, "role {}", role);
        }
    }

    #[test]
    fn test_capability_names() {
        assert_eq!(Capability::CanCreateBlogPosts.as_str(), "canCreateBlogPosts");
        assert_eq!(Capability::parse("canAssignRoles"), Some(Capability::CanAssignRoles));
        assert_eq!(Capability::parse("canFly"), None);

        let json = serde_json::to_string(&Capability::CanDeleteOthersResources).unwrap();
        assert_eq!(json, "\"canDeleteOthersResources\"");
    }

    #[test]
    fn test_permission_set_serializes_camel_case() {
        let json = serde_json::to_value(PermissionSet::for_role(Some(Role::Company))).unwrap();
        assert_eq!(json["canCreateBlogPosts"], true);
        assert_eq!(json["canDeleteUsers"], false);
        assert_eq!(json["isModerator"], false);
    }

    #[test]
    fn test_contains_any() {
        let tech = PermissionSet::for_role(Some(Role::Technician));
        assert!(tech.contains_any(&[Capability::CanDeleteUsers, Capability::CanPublishResources]));
        assert!(!tech.contains_any(&[Capability::CanDeleteUsers, Capability::IsModerator]));
    }
}
