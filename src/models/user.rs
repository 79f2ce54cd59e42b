//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::config::RewardsConfig;

/// Rank awarded from accumulated points, ordered Bronze < Platinum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_rank", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Rank {
    /// Rank for a point total under the configured thresholds
    pub fn for_points(points: i64, rewards: &RewardsConfig) -> Self {
        if points >= rewards.platinum_threshold {
            Rank::Platinum
        } else if points >= rewards.gold_threshold {
            Rank::Gold
        } else if points >= rewards.silver_threshold {
            Rank::Silver
        } else {
            Rank::Bronze
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rank::Bronze => write!(f, "bronze"),
            Rank::Silver => write!(f, "silver"),
            Rank::Gold => write!(f, "gold"),
            Rank::Platinum => write!(f, "platinum"),
        }
    }
}

/// Denormalized per-user aggregates, mutated only via atomic increments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountStats {
    pub points: i64,
    pub rank: Rank,
    pub events_attended_count: i32,
    pub events_organized: i32,
    pub friends_count: i32,
    pub comments_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    /// Never serialized in responses
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub age: Option<i32>,
    pub profile_picture_url: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
    #[sqlx(flatten)]
    pub account_stats: AccountStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub age: Option<i32>,
    pub profile_picture_url: Option<String>,
}

/// Profile fields a user may change about themselves.
///
/// Role, activation, stats and password hash are deliberately absent;
/// they move only through their dedicated admin/credential operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub age: Option<i32>,
    pub profile_picture_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rewards() -> RewardsConfig {
        RewardsConfig {
            points_per_event: 50,
            silver_threshold: 100,
            gold_threshold: 500,
            platinum_threshold: 2000,
        }
    }

    #[test]
    fn test_rank_thresholds() {
        let r = rewards();
        assert_eq!(Rank::for_points(0, &r), Rank::Bronze);
        assert_eq!(Rank::for_points(99, &r), Rank::Bronze);
        assert_eq!(Rank::for_points(100, &r), Rank::Silver);
        assert_eq!(Rank::for_points(499, &r), Rank::Silver);
        assert_eq!(Rank::for_points(500, &r), Rank::Gold);
        assert_eq!(Rank::for_points(2000, &r), Rank::Platinum);
        assert_eq!(Rank::for_points(1_000_000, &r), Rank::Platinum);
    }

    proptest! {
        #[test]
        fn prop_rank_monotone_in_points(a in 0i64..5000, b in 0i64..5000) {
            let r = rewards();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Rank::for_points(lo, &r) <= Rank::for_points(hi, &r));
        }
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: 1,
            username: "volunteer_1".to_string(),
            email: "v1@example.com".to_string(),
            phone: None,
            password_hash: "secret-hash".to_string(),
            first_name: None,
            last_name: None,
            city: None,
            state: None,
            age: None,
            profile_picture_url: None,
            is_admin: false,
            is_active: true,
            account_stats: AccountStats {
                points: 0,
                rank: Rank::Bronze,
                events_attended_count: 0,
                events_organized: 0,
                friends_count: 0,
                comments_count: 0,
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("volunteer_1"));
    }
}
