//! Integration tests for the email-verification token flow

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{test_config, test_hasher, CountingDirectory};
use tollbooth_auth_core::{
    AuthError, Claims, SessionAuthority, TokenPurpose, VerificationFlow,
};
use tollbooth_store::{MemoryDirectory, MemoryRevocationStore, UserDirectory};
use tollbooth_types::UserId;

#[tokio::test]
async fn consume_flips_the_verified_flag() {
    let directory = Arc::new(MemoryDirectory::new());
    let flow = VerificationFlow::new(&test_config(), Arc::clone(&directory));

    let authority = SessionAuthority::new(
        &test_config(),
        Arc::clone(&directory),
        Arc::new(MemoryRevocationStore::new()),
        test_hasher(),
    );
    let user = authority.register("mallory@example.com", "pw123456").await.unwrap();
    assert!(!user.is_verified);

    let token = flow.issue(user.id).unwrap();
    let consumed_id = flow.consume(&token).await.unwrap();
    assert_eq!(consumed_id, user.id);

    let record = directory.find_by_id(user.id).await.unwrap().unwrap();
    assert!(record.is_verified);
}

#[tokio::test]
async fn consume_twice_is_idempotent_with_one_mutation() {
    let directory = Arc::new(CountingDirectory::new(MemoryDirectory::new()));
    let flow = VerificationFlow::new(&test_config(), Arc::clone(&directory));

    let user = directory
        .create(tollbooth_store::NewUser {
            id: UserId::new(),
            email: "nina@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: tollbooth_types::Role::User,
        })
        .await
        .unwrap();

    let token = flow.issue(user.id).unwrap();

    // Both calls succeed; only the first one mutates
    flow.consume(&token).await.unwrap();
    flow.consume(&token).await.unwrap();
    assert_eq!(directory.set_verified_calls(), 1);
}

#[tokio::test]
async fn consume_for_missing_user_fails() {
    let directory = Arc::new(MemoryDirectory::new());
    let flow = VerificationFlow::new(&test_config(), Arc::clone(&directory));

    let token = flow.issue(UserId::new()).unwrap();
    let result = flow.consume(&token).await;
    assert!(matches!(result, Err(AuthError::UserNotFound)));
}

#[tokio::test]
async fn refresh_token_cannot_verify_an_account() {
    let directory = Arc::new(MemoryDirectory::new());
    let flow = VerificationFlow::new(&test_config(), Arc::clone(&directory));
    let revocations = Arc::new(MemoryRevocationStore::new());

    let authority = SessionAuthority::new(
        &test_config(),
        Arc::clone(&directory),
        revocations,
        test_hasher(),
    );
    let user = authority.register("oscar@example.com", "pw123456").await.unwrap();
    directory.set_verified(user.id, true).await.unwrap();

    let pair = authority.login("oscar@example.com", "pw123456").await.unwrap();
    let result = flow.consume(&pair.refresh_token).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn expired_verification_token_is_expired() {
    let directory = Arc::new(MemoryDirectory::new());
    let flow = VerificationFlow::new(&test_config(), Arc::clone(&directory));

    let now = chrono::Utc::now().timestamp();
    let stale = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &Claims {
            sub: UserId::new().to_string(),
            purpose: TokenPurpose::Verification,
            role: None,
            iat: now - 3600,
            exp: now - 1800,
            jti: uuid::Uuid::new_v4(),
        },
        &jsonwebtoken::EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let result = flow.consume(&stale).await;
    assert!(matches!(result, Err(AuthError::TokenExpired)));
}

#[tokio::test]
async fn registration_to_login_flow() {
    let directory = Arc::new(MemoryDirectory::new());
    let flow = VerificationFlow::new(&test_config(), Arc::clone(&directory));
    let authority = SessionAuthority::new(
        &test_config(),
        Arc::clone(&directory),
        Arc::new(MemoryRevocationStore::new()),
        test_hasher(),
    );

    let user = authority.register("peggy@example.com", "pw123456").await.unwrap();

    // Login is gated until the email is verified
    let early = authority.login("peggy@example.com", "pw123456").await;
    assert!(matches!(early, Err(AuthError::AccountUnverified)));

    let token = flow.issue(user.id).unwrap();
    flow.consume(&token).await.unwrap();

    let pair = authority.login("peggy@example.com", "pw123456").await.unwrap();
    assert!(!pair.access_token.is_empty());

    // A verification token lives for minutes, not days
    let config = test_config();
    assert!(config.verification_ttl <= Duration::from_secs(60 * 60));
}
