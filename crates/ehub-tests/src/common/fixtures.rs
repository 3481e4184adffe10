// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Seed members and configurations shared by the integration suites.

use ehub_api::ApiConfig;
use ehub_config::{HubConfig, SecretValue, UserSeed};
use ehub_core::{Role, UserRecord};

/// Signing secret used by every fixture configuration.
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

// =============================================================================
// User Fixtures
// =============================================================================

/// Seed members, one per role.
pub struct UserFixtures;

impl UserFixtures {
    /// Engineer.
    pub const ADA: &'static str = "u-ada";
    /// Technician.
    pub const TOM: &'static str = "u-tom";
    /// Vendor.
    pub const VERA: &'static str = "u-vera";
    /// Company account.
    pub const CORA: &'static str = "u-cora";
    /// Admin, also on the admin allow-list.
    pub const OPS: &'static str = "u-ops";
    /// Moderator.
    pub const MO: &'static str = "u-mo";
    /// Plain member.
    pub const PAT: &'static str = "u-pat";

    /// Email of the allow-listed admin.
    pub const OPS_EMAIL: &'static str = "ops@electricianhub.test";

    /// All seed records.
    pub fn all() -> Vec<UserRecord> {
        vec![
            UserRecord::new(Self::ADA, "ada@electricianhub.test", Role::Engineer)
                .with_display_name("Ada"),
            UserRecord::new(Self::TOM, "tom@electricianhub.test", Role::Technician),
            UserRecord::new(Self::VERA, "vera@electricianhub.test", Role::Vendor),
            UserRecord::new(Self::CORA, "cora@electricianhub.test", Role::Company),
            UserRecord::new(Self::OPS, Self::OPS_EMAIL, Role::Admin),
            UserRecord::new(Self::MO, "mo@electricianhub.test", Role::Moderator),
            UserRecord::new(Self::PAT, "pat@electricianhub.test", Role::User),
        ]
    }

    /// Returns the seed record for `uid`.
    pub fn get(uid: &str) -> Option<UserRecord> {
        Self::all().into_iter().find(|u| u.uid == uid)
    }

    /// Returns the email of a seed member.
    pub fn email(uid: &str) -> String {
        Self::get(uid).map(|u| u.email).unwrap_or_default()
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Ready-made configurations.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A valid hub configuration with every seed member.
    pub fn hub_config() -> HubConfig {
        let mut config = HubConfig::default();
        config.server.port = 0;
        config.security.jwt.secret = Some(SecretValue::new(TEST_SECRET));
        config.access.admin_emails = vec![UserFixtures::OPS_EMAIL.to_string()];
        config.users = UserFixtures::all()
            .into_iter()
            .map(|u| UserSeed {
                uid: u.uid,
                email: u.email,
                display_name: u.display_name,
                role: u.role,
            })
            .collect();
        config
    }

    /// API configuration derived from [`ConfigFixtures::hub_config`].
    pub fn api_config() -> ApiConfig {
        ApiConfig::from(&Self::hub_config())
    }

    /// A YAML configuration seeding Ada and the admin.
    pub fn yaml() -> String {
        format!(
            r#"
server:
  bind_address: 127.0.0.1
  port: 9090
  request_timeout_secs: 10
  cors:
    allowed_origins: ["https://electricianhub.test"]
    allow_credentials: true
security:
  jwt:
    secret: "{secret}"
    lifetime_secs: 900
  audit:
    sink: memory
access:
  admin_emails: ["{ops_email}"]
users:
  - uid: {ada}
    email: ada@electricianhub.test
    display_name: Ada
    role: engineer
  - uid: {ops}
    email: {ops_email}
    role: admin
logging:
  level: debug
  format: json
"#,
            secret = TEST_SECRET,
            ada = UserFixtures::ADA,
            ops = UserFixtures::OPS,
            ops_email = UserFixtures::OPS_EMAIL,
        )
    }
}
