// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `token` command.

use ehub_api::{AppState, MintedToken};
use tracing::info;

use crate::cli::{Cli, OutputFormat, TokenArgs};
use crate::error::BinResult;
use crate::runtime::RuntimeBuilder;

/// Mints a development ID token for a seeded user and prints it.
pub async fn token(cli: &Cli, args: TokenArgs) -> BinResult<()> {
    let runtime = RuntimeBuilder::new().config_path(&cli.config).build()?;
    let state = runtime.app_state()?;

    let minted = mint_for(&state, &args.uid, args.sync).await?;

    match args.format {
        OutputFormat::Text => println!("{}", minted.id_token),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&minted)?),
    }
    Ok(())
}

/// Mints a token for `uid`, issuing its claims first when `sync` is set.
pub async fn mint_for(state: &AppState, uid: &str, sync: bool) -> BinResult<MintedToken> {
    if sync {
        let claims = state.propagator().sync_user(None, uid).await?;
        info!(uid = %uid, role = %claims.role, "Claims issued before minting");
    }
    Ok(state.tokens().mint(uid).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BinError;
    use crate::runtime::HubRuntime;
    use ehub_config::{HubConfig, SecretValue, UserSeed};
    use ehub_core::Role;

    fn state() -> AppState {
        let mut config = HubConfig::default();
        config.security.jwt.secret = Some(SecretValue::new("token-command-secret-0123456789abcdef"));
        config.users.push(UserSeed {
            uid: "u-7".to_string(),
            email: "vera@hub.test".to_string(),
            display_name: Some("Vera".to_string()),
            role: Role::Vendor,
        });
        HubRuntime::new(config).app_state().unwrap()
    }

    #[tokio::test]
    async fn test_fresh_identity_has_no_claims() {
        let minted = mint_for(&state(), "u-7", false).await.unwrap();
        assert!(minted.claims.is_none());
        assert_eq!(minted.token_type, "Bearer");
    }

    #[tokio::test]
    async fn test_sync_embeds_claims() {
        let state = state();
        let minted = mint_for(&state, "u-7", true).await.unwrap();
        assert_eq!(minted.claims.map(|c| c.role), Some(Role::Vendor));

        let decoded = state.jwt().validate_token(&minted.id_token).unwrap();
        assert_eq!(decoded.claims.uid(), "u-7");
    }

    #[tokio::test]
    async fn test_unknown_uid_fails() {
        let err = mint_for(&state(), "nobody", true).await.unwrap_err();
        assert!(matches!(err, BinError::Propagation(_)));

        let err = mint_for(&state(), "nobody", false).await.unwrap_err();
        assert!(matches!(err, BinError::Api(_)));
    }
}
