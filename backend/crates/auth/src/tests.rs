//! Use-case and router tests for the auth crate
//!
//! Everything runs against `MemoryUserRepository`.

#[cfg(test)]
mod support {
    use std::sync::Arc;

    use crate::application::{AuthConfig, RegisterInput, RegisterUseCase};
    use crate::domain::entity::User;
    use crate::infra::memory::MemoryUserRepository;

    pub const PASSWORD: &str = "Valid#Pass1";
    pub const ADMIN_KEY: &str = "club-admin-key";

    pub fn setup() -> (Arc<MemoryUserRepository>, Arc<AuthConfig>) {
        let config = AuthConfig {
            admin_key: Some(ADMIN_KEY.to_string()),
            ..AuthConfig::with_random_secrets()
        };
        (Arc::new(MemoryUserRepository::new()), Arc::new(config))
    }

    pub fn input(name: &str, email: &str) -> RegisterInput {
        RegisterInput {
            user_name: name.to_string(),
            email: email.to_string(),
            password: PASSWORD.to_string(),
            role: None,
            admin_key: None,
        }
    }

    pub async fn register(
        repo: &Arc<MemoryUserRepository>,
        config: &Arc<AuthConfig>,
        name: &str,
        email: &str,
    ) -> User {
        RegisterUseCase::new(repo.clone(), config.clone())
            .execute(input(name, email))
            .await
            .unwrap()
    }

    pub async fn register_admin(
        repo: &Arc<MemoryUserRepository>,
        config: &Arc<AuthConfig>,
        name: &str,
        email: &str,
    ) -> User {
        RegisterUseCase::new(repo.clone(), config.clone())
            .execute(RegisterInput {
                role: Some("admin".to_string()),
                admin_key: Some(ADMIN_KEY.to_string()),
                ..input(name, email)
            })
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod register_tests {
    use super::support::*;
    use crate::application::{AuthConfig, RegisterInput, RegisterUseCase};
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::UserId;
    use crate::domain::value_object::user_role::UserRole;
    use crate::error::AuthError;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let (repo, config) = setup();
        let user = register(&repo, &config, "alice", "alice@example.com").await;

        assert_eq!(user.user_role, UserRole::User);
        assert!(user.refresh_token.is_none());

        let stored = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert!(stored.password.as_phc_string().starts_with("$argon2id$"));
        assert!(!stored.password.as_phc_string().contains(PASSWORD));
    }

    #[tokio::test]
    async fn test_duplicate_user_name_rejected() {
        let (repo, config) = setup();
        register(&repo, &config, "alice", "alice@example.com").await;

        let err = RegisterUseCase::new(repo.clone(), config.clone())
            .execute(input("alice", "other@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::UserNameTaken));
        assert_eq!(err.status_code(), 400);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_register_same_name_has_one_winner() {
        let (repo, config) = setup();
        let use_case = RegisterUseCase::new(repo.clone(), config.clone());

        let (first, second) = tokio::join!(
            use_case.execute(input("alice", "alice@example.com")),
            use_case.execute(input("alice", "alice2@example.com")),
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(AuthError::UserNameTaken)))
        );
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (repo, config) = setup();
        register(&repo, &config, "alice", "alice@example.com").await;

        let err = RegisterUseCase::new(repo.clone(), config.clone())
            .execute(input("bob", "ALICE@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_find_by_ids_skips_unknown() {
        let (repo, config) = setup();
        let alice = register(&repo, &config, "alice", "alice@example.com").await;
        let bob = register(&repo, &config, "bob", "bob@example.com").await;

        let found = repo
            .find_by_ids(&[alice.user_id, UserId::new(), bob.user_id])
            .await
            .unwrap();

        let mut names: Vec<&str> = found.iter().map(|u| u.user_name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, ["alice", "bob"]);
        assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_name_uniqueness_is_case_sensitive() {
        let (repo, config) = setup();
        register(&repo, &config, "alice", "alice@example.com").await;
        register(&repo, &config, "Alice", "alice2@example.com").await;

        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_validation_collects_every_error() {
        let (repo, config) = setup();

        let err = RegisterUseCase::new(repo.clone(), config.clone())
            .execute(RegisterInput {
                user_name: "a".to_string(),
                email: "not-an-email".to_string(),
                password: "short".to_string(),
                role: Some("owner".to_string()),
                admin_key: None,
            })
            .await
            .unwrap_err();

        match err {
            AuthError::Validation(errors) => assert!(errors.len() >= 4, "{errors:?}"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_admin_requires_matching_key() {
        let (repo, config) = setup();
        let use_case = RegisterUseCase::new(repo.clone(), config.clone());

        let missing = use_case
            .execute(RegisterInput {
                role: Some("admin".to_string()),
                ..input("root", "root@example.com")
            })
            .await
            .unwrap_err();
        assert!(matches!(missing, AuthError::InvalidAdminKey));

        let wrong = use_case
            .execute(RegisterInput {
                role: Some("admin".to_string()),
                admin_key: Some("guess".to_string()),
                ..input("root", "root@example.com")
            })
            .await
            .unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidAdminKey));

        let admin = register_admin(&repo, &config, "root", "root@example.com").await;
        assert!(admin.is_admin());
    }

    #[tokio::test]
    async fn test_admin_refused_without_configured_key() {
        let repo = Arc::new(crate::infra::memory::MemoryUserRepository::new());
        let config = Arc::new(AuthConfig::with_random_secrets());

        let err = RegisterUseCase::new(repo, config)
            .execute(RegisterInput {
                role: Some("admin".to_string()),
                admin_key: Some(String::new()),
                ..input("root", "root@example.com")
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidAdminKey));
    }

    #[tokio::test]
    async fn test_email_domain_restriction() {
        let repo = Arc::new(crate::infra::memory::MemoryUserRepository::new());
        let config = Arc::new(AuthConfig {
            allowed_email_domain: Some("iiitkota.ac.in".to_string()),
            ..AuthConfig::with_random_secrets()
        });
        let use_case = RegisterUseCase::new(repo, config);

        let err = use_case
            .execute(input("alice", "alice@gmail.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        assert!(use_case
            .execute(input("alice", "2021kucp1001@iiitkota.ac.in"))
            .await
            .is_ok());
    }
}

#[cfg(test)]
mod token_tests {
    use super::support::*;
    use crate::application::{
        RefreshUseCase, SignInInput, SignInUseCase, SignOutUseCase, TokenService,
    };
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::token_claims::AccessClaims;
    use crate::error::AuthError;

    fn sign_in_input(identifier: &str, password: &str) -> SignInInput {
        SignInInput {
            identifier: identifier.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_by_name_or_email() {
        let (repo, config) = setup();
        let user = register(&repo, &config, "alice", "alice@example.com").await;
        let use_case = SignInUseCase::new(repo.clone(), config.clone());

        let by_name = use_case.execute(sign_in_input("alice", PASSWORD)).await.unwrap();
        assert_eq!(by_name.user.user_id, user.user_id);

        let by_email = use_case
            .execute(sign_in_input("Alice@Example.com", PASSWORD))
            .await
            .unwrap();
        assert_eq!(by_email.user.user_id, user.user_id);

        // 最後に発行したリフレッシュトークンだけが保存される
        let stored = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some(by_email.tokens.refresh_token.as_str()));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (repo, config) = setup();
        register(&repo, &config, "alice", "alice@example.com").await;
        let use_case = SignInUseCase::new(repo.clone(), config.clone());

        let wrong_password = use_case
            .execute(sign_in_input("alice", "Wrong#Pass1"))
            .await
            .unwrap_err();
        let unknown_user = use_case
            .execute(sign_in_input("nobody", PASSWORD))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_refresh_rotation_then_replay_rejected() {
        let (repo, config) = setup();
        register(&repo, &config, "alice", "alice@example.com").await;
        let login = SignInUseCase::new(repo.clone(), config.clone())
            .execute(sign_in_input("alice", PASSWORD))
            .await
            .unwrap();

        let refresh = RefreshUseCase::new(repo.clone(), config.clone());
        let old = login.tokens.refresh_token.clone();

        let (_, rotated) = refresh.execute(Some(old.clone())).await.unwrap();
        assert_ne!(rotated.refresh_token, old);

        let replay = refresh.execute(Some(old.clone())).await.unwrap_err();
        assert!(matches!(replay, AuthError::InvalidRefreshToken));

        // 一度ローテーションされたトークンは二度と通らない
        let again = refresh.execute(Some(old)).await.unwrap_err();
        assert!(matches!(again, AuthError::InvalidRefreshToken));

        assert!(refresh.execute(Some(rotated.refresh_token)).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_after_logout_rejected() {
        let (repo, config) = setup();
        let user = register(&repo, &config, "alice", "alice@example.com").await;
        let login = SignInUseCase::new(repo.clone(), config.clone())
            .execute(sign_in_input("alice", PASSWORD))
            .await
            .unwrap();

        SignOutUseCase::new(repo.clone(), config.clone())
            .execute(&user.user_id)
            .await
            .unwrap();

        let err = RefreshUseCase::new(repo.clone(), config.clone())
            .execute(Some(login.tokens.refresh_token))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn test_refresh_rejects_missing_and_foreign_tokens() {
        let (repo, config) = setup();
        let refresh = RefreshUseCase::new(repo.clone(), config.clone());

        assert!(matches!(
            refresh.execute(None).await.unwrap_err(),
            AuthError::InvalidRefreshToken
        ));
        assert!(matches!(
            refresh.execute(Some("   ".to_string())).await.unwrap_err(),
            AuthError::InvalidRefreshToken
        ));

        // アクセストークンはリフレッシュには使えない（別シークレット）
        let user = register(&repo, &config, "alice", "alice@example.com").await;
        let access = TokenService::new(repo.clone(), config.clone())
            .issue_access_token(&user)
            .unwrap();
        assert!(matches!(
            refresh.execute(Some(access)).await.unwrap_err(),
            AuthError::InvalidRefreshToken
        ));
    }

    #[tokio::test]
    async fn test_concurrent_refresh_has_one_winner() {
        let (repo, config) = setup();
        let user = register(&repo, &config, "alice", "alice@example.com").await;
        let tokens = TokenService::new(repo.clone(), config.clone());
        let old = tokens.issue_refresh_token(&user).await.unwrap();

        let (first, second) = tokio::join!(tokens.refresh(&old), tokens.refresh(&old));

        let winners: Vec<_> = [first, second]
            .into_iter()
            .filter_map(|r| match r {
                Ok((_, pair)) => Some(pair),
                Err(e) => {
                    assert!(matches!(e, AuthError::InvalidRefreshToken));
                    None
                }
            })
            .collect();
        assert_eq!(winners.len(), 1);

        // 勝者のトークンだけが保存されている
        let stored = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert_eq!(
            stored.refresh_token.as_deref(),
            Some(winners[0].refresh_token.as_str())
        );
    }

    #[tokio::test]
    async fn test_rotate_refresh_token_compares_before_swap() {
        let (repo, config) = setup();
        let user = register(&repo, &config, "alice", "alice@example.com").await;
        let tokens = TokenService::new(repo.clone(), config.clone());
        let current = tokens.issue_refresh_token(&user).await.unwrap();

        let first = repo
            .rotate_refresh_token(&user.user_id, &current, "next-a")
            .await
            .unwrap();
        let second = repo
            .rotate_refresh_token(&user.user_id, &current, "next-b")
            .await
            .unwrap();

        assert!(first);
        assert!(!second);
    }

    #[tokio::test]
    async fn test_expired_access_token_rejected() {
        let (repo, config) = setup();
        let user = register(&repo, &config, "alice", "alice@example.com").await;

        let now = platform::jwt::now_secs();
        let claims = AccessClaims {
            sub: user.user_id.into_uuid(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            iat: now - 3600,
            exp: now - 1,
        };
        let token = platform::jwt::sign(&claims, &config.access_token_secret).unwrap();

        let err = TokenService::new(repo.clone(), config.clone())
            .verify_access_token(&token)
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }
}

#[cfg(test)]
mod account_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::support::*;
    use crate::application::{
        ChangePasswordInput, ChangePasswordUseCase, DeleteUserUseCase, SignInInput,
        SignInUseCase, UpdateEmailUseCase,
    };
    use crate::domain::cascade::UserCascade;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::UserId;
    use crate::error::AuthError;
    use kernel::error::app_error::AppResult;

    #[derive(Clone, Default)]
    struct CountingCascade {
        calls: Arc<AtomicU64>,
    }

    impl UserCascade for CountingCascade {
        async fn before_user_delete(&self, _user_id: &UserId) -> AppResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(3)
        }
    }

    #[tokio::test]
    async fn test_change_password_requires_old_password() {
        let (repo, config) = setup();
        let user = register(&repo, &config, "alice", "alice@example.com").await;
        let use_case = ChangePasswordUseCase::new(repo.clone(), config.clone());

        let err = use_case
            .execute(
                &user.user_id,
                ChangePasswordInput {
                    old_password: "Wrong#Pass1".to_string(),
                    new_password: "Newer#Pass2".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.status_code(), 401);

        use_case
            .execute(
                &user.user_id,
                ChangePasswordInput {
                    old_password: PASSWORD.to_string(),
                    new_password: "Newer#Pass2".to_string(),
                },
            )
            .await
            .unwrap();

        let sign_in = SignInUseCase::new(repo.clone(), config.clone());
        assert!(sign_in
            .execute(SignInInput {
                identifier: "alice".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .is_err());
        assert!(sign_in
            .execute(SignInInput {
                identifier: "alice".to_string(),
                password: "Newer#Pass2".to_string(),
            })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_change_password_enforces_policy() {
        let (repo, config) = setup();
        let user = register(&repo, &config, "alice", "alice@example.com").await;

        let err = ChangePasswordUseCase::new(repo.clone(), config.clone())
            .execute(
                &user.user_id,
                ChangePasswordInput {
                    old_password: PASSWORD.to_string(),
                    new_password: "weak".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_update_email_rejects_taken() {
        let (repo, config) = setup();
        let alice = register(&repo, &config, "alice", "alice@example.com").await;
        register(&repo, &config, "bob", "bob@example.com").await;
        let use_case = UpdateEmailUseCase::new(repo.clone(), config.clone());

        let err = use_case
            .execute(&alice.user_id, "bob@example.com".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        let updated = use_case
            .execute(&alice.user_id, "Alice.New@Example.com".to_string())
            .await
            .unwrap();
        assert_eq!(updated.email.as_str(), "alice.new@example.com");
    }

    #[tokio::test]
    async fn test_delete_runs_cascade_first() {
        let (repo, config) = setup();
        let user = register(&repo, &config, "alice", "alice@example.com").await;
        let cascade = Arc::new(CountingCascade::default());

        let use_case = DeleteUserUseCase::new(repo.clone(), cascade.clone());
        use_case.execute(&user.user_id).await.unwrap();

        assert_eq!(cascade.calls.load(Ordering::SeqCst), 1);
        assert!(repo.find_by_id(&user.user_id).await.unwrap().is_none());

        let again = use_case.execute(&user.user_id).await.unwrap_err();
        assert!(matches!(again, AuthError::UserNotFound));
        assert_eq!(cascade.calls.load(Ordering::SeqCst), 1);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::domain::cascade::NoCascade;
    use crate::domain::value_object::token_claims::AccessClaims;
    use crate::presentation::router::auth_router_generic;

    fn app() -> (Router, std::sync::Arc<crate::application::AuthConfig>) {
        let (repo, config) = setup();
        (auth_router_generic(repo, NoCascade, config.clone()), config)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register_and_login(app: &Router, name: &str, admin: bool) -> Value {
        let mut body = json!({
            "username": name,
            "email": format!("{name}@example.com"),
            "password": PASSWORD,
        });
        if admin {
            body["role"] = json!("admin");
            body["key"] = json!(ADMIN_KEY);
        }

        let response = app
            .clone()
            .oneshot(json_request("POST", "/register", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/login",
                json!({ "usernameOrEmail": name, "password": PASSWORD }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get_all(header::SET_COOKIE).iter().count(), 2);

        body_json(response).await["data"].clone()
    }

    #[tokio::test]
    async fn test_register_envelope() {
        let (app, _) = app();

        let response = app
            .oneshot(json_request(
                "POST",
                "/register",
                json!({
                    "username": "alice",
                    "email": "alice@example.com",
                    "password": PASSWORD,
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["statusCode"], 201);
        assert_eq!(body["data"]["username"], "alice");
        assert_eq!(body["data"]["role"], "user");
        assert!(body["data"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let (app, _) = app();

        let response = app
            .oneshot(Request::builder().uri("/get-user").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["statusCode"], 401);
    }

    #[tokio::test]
    async fn test_bearer_and_cookie_both_accepted() {
        let (app, _) = app();
        let data = register_and_login(&app, "alice", false).await;
        let token = data["accessToken"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(bearer_request("GET", "/get-user", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["username"], "alice");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/get-user")
                    .header(header::COOKIE, format!("accessToken={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_expired_token_rejected_by_middleware() {
        let (app, config) = app();
        let data = register_and_login(&app, "alice", false).await;

        let now = platform::jwt::now_secs();
        let claims = AccessClaims {
            sub: data["user"]["id"].as_str().unwrap().parse().unwrap(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            iat: now - 7200,
            exp: now - 10,
        };
        let expired = platform::jwt::sign(&claims, &config.access_token_secret).unwrap();

        let response = app
            .oneshot(bearer_request("GET", "/get-user", &expired))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_routes_gated_by_role() {
        let (app, _) = app();
        let user = register_and_login(&app, "alice", false).await;
        let admin = register_and_login(&app, "root", true).await;

        let response = app
            .clone()
            .oneshot(bearer_request(
                "GET",
                "/all-users",
                user["accessToken"].as_str().unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(bearer_request(
                "GET",
                "/all-users",
                admin["accessToken"].as_str().unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_generate_token_from_cookie_then_replay() {
        let (app, _) = app();
        let data = register_and_login(&app, "alice", false).await;
        let refresh = data["refreshToken"].as_str().unwrap().to_string();

        let cookie_request = || {
            Request::builder()
                .method("POST")
                .uri("/generate-token")
                .header(header::COOKIE, format!("refreshToken={refresh}"))
                .body(Body::empty())
                .unwrap()
        };

        let response = app.clone().oneshot(cookie_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let rotated = body_json(response).await;
        assert_ne!(rotated["data"]["refreshToken"].as_str(), Some(refresh.as_str()));

        let response = app.oneshot(cookie_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_delete_account_clears_cookies_and_token_stops_working() {
        let (app, _) = app();
        let data = register_and_login(&app, "alice", false).await;
        let token = data["accessToken"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(bearer_request("DELETE", "/delete", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cleared: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        assert_eq!(cleared.len(), 2);
        assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));

        let response = app
            .oneshot(bearer_request("GET", "/get-user", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
