use tracing::warn;
use uuid::Uuid;

use super::repo::{User, UserRepo};
use crate::auth::password::{hash_password, verify_password};
use crate::error::ApiError;

pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Creates a new account after best-effort duplicate checks. The unique
/// indexes on email and username are the real enforcement point; a raced
/// insert surfaces as a store error.
pub async fn register(repo: &dyn UserRepo, account: NewAccount) -> Result<User, ApiError> {
    if repo.find_by_email(&account.email).await?.is_some() {
        return Err(ApiError::Conflict(
            "user with this email already exists".into(),
        ));
    }
    if repo.find_by_username(&account.username).await?.is_some() {
        return Err(ApiError::Conflict("username already taken".into()));
    }

    let hash = hash_password(&account.password)?;
    let user = repo.create(&account.username, &account.email, &hash).await?;
    Ok(user)
}

/// Unknown email and wrong password fail identically so callers cannot
/// probe which accounts exist.
pub async fn login(repo: &dyn UserRepo, email: &str, password: &str) -> Result<User, ApiError> {
    let Some(user) = repo.find_by_email(email).await? else {
        return Err(ApiError::InvalidCredentials);
    };

    let ok = match verify_password(password, &user.password_hash) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, user_id = %user.id, "stored hash failed verification");
            false
        }
    };
    if !ok {
        return Err(ApiError::InvalidCredentials);
    }

    Ok(user)
}

pub async fn get_profile(repo: &dyn UserRepo, user_id: Uuid) -> Result<User, ApiError> {
    repo.find_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))
}

pub async fn change_username(
    repo: &dyn UserRepo,
    user_id: Uuid,
    new_username: &str,
) -> Result<(), ApiError> {
    if repo.find_by_username(new_username).await?.is_some() {
        return Err(ApiError::Conflict("username already taken".into()));
    }
    repo.update_username(user_id, new_username).await?;
    Ok(())
}

pub async fn change_password(
    repo: &dyn UserRepo,
    user_id: Uuid,
    old_password: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    let user = repo
        .find_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let ok = verify_password(old_password, &user.password_hash).unwrap_or(false);
    if !ok {
        return Err(ApiError::Validation("incorrect old password".into()));
    }

    let hash = hash_password(new_password)?;
    repo.update_password(user_id, &hash).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::mem::MemoryUserRepo;

    fn alice() -> NewAccount {
        NewAccount {
            username: "alice".into(),
            email: "a@x.com".into(),
            password: "Secret123".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login_succeeds() {
        let repo = MemoryUserRepo::default();
        let user = register(&repo, alice()).await.expect("register");
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "Secret123");

        let logged_in = login(&repo, "a@x.com", "Secret123").await.expect("login");
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let repo = MemoryUserRepo::default();
        register(&repo, alice()).await.expect("first register");

        let err = register(
            &repo,
            NewAccount {
                username: "alice2".into(),
                email: "a@x.com".into(),
                password: "Other123".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        // No second account was created.
        assert!(repo.find_by_username("alice2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let repo = MemoryUserRepo::default();
        register(&repo, alice()).await.expect("first register");

        let err = register(
            &repo,
            NewAccount {
                username: "alice".into(),
                email: "b@x.com".into(),
                password: "Other123".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let repo = MemoryUserRepo::default();
        register(&repo, alice()).await.expect("register");

        let wrong_password = login(&repo, "a@x.com", "nope").await.unwrap_err();
        let unknown_email = login(&repo, "ghost@x.com", "Secret123").await.unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, ApiError::InvalidCredentials));
        assert!(matches!(unknown_email, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn profile_never_leaks_password_material() {
        let repo = MemoryUserRepo::default();
        let user = register(&repo, alice()).await.expect("register");

        let profile = get_profile(&repo, user.id).await.expect("profile");
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("Secret123"));
        assert!(!json.contains(&profile.password_hash));
    }

    #[tokio::test]
    async fn change_username_rejects_taken_name() {
        let repo = MemoryUserRepo::default();
        let user = register(&repo, alice()).await.expect("register");
        register(
            &repo,
            NewAccount {
                username: "bob".into(),
                email: "b@x.com".into(),
                password: "Other123".into(),
            },
        )
        .await
        .expect("register bob");

        let err = change_username(&repo, user.id, "bob").await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        change_username(&repo, user.id, "alice_two")
            .await
            .expect("rename");
        let renamed = get_profile(&repo, user.id).await.expect("profile");
        assert_eq!(renamed.username, "alice_two");
    }

    #[tokio::test]
    async fn change_password_checks_old_password() {
        let repo = MemoryUserRepo::default();
        let user = register(&repo, alice()).await.expect("register");

        let err = change_password(&repo, user.id, "wrong-old", "NewSecret1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        change_password(&repo, user.id, "Secret123", "NewSecret1")
            .await
            .expect("change password");
        login(&repo, "a@x.com", "NewSecret1")
            .await
            .expect("login with new password");
        assert!(login(&repo, "a@x.com", "Secret123").await.is_err());
    }
}
