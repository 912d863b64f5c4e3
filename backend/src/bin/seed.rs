//! Operator-run household seeding.
//!
//! Loads a household (the built-in demo family by default, or a JSON file)
//! and inserts each member through the repository port. Existing emails are
//! skipped, so re-running against a populated database is harmless.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use famtree_backend::domain::ports::{MemberRepository, PasswordHasher as _};
use famtree_backend::domain::{
    AccountRole, Email, FamilyRole, NewMember, SocialLinks, TreePosition,
};
use famtree_backend::outbound::persistence::{DbPool, DieselMemberRepository, run_migrations};
use famtree_backend::outbound::security::Argon2PasswordHasher;
use seed_data::{Household, SeedMember};

/// Seed the member store with a demonstration household.
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct Args {
    /// PostgreSQL connection string; falls back to FAMILY_TREE_DATABASE_URL.
    #[arg(long)]
    database_url: Option<String>,
    /// Household JSON file; the built-in demo family is used when omitted.
    #[arg(long)]
    household: Option<PathBuf>,
}

fn seed_to_new_member(seed: &SeedMember, password_hash: String) -> std::io::Result<NewMember> {
    let email = Email::new(&seed.email)
        .map_err(|error| std::io::Error::other(format!("{}: {error}", seed.email)))?;
    let account_role = AccountRole::parse(&seed.account_role)
        .ok_or_else(|| std::io::Error::other(format!("unknown account role {:?}", seed.account_role)))?;
    let family_role = FamilyRole::parse(&seed.family_role)
        .ok_or_else(|| std::io::Error::other(format!("unknown family role {:?}", seed.family_role)))?;
    let position = TreePosition::new(seed.position.row, seed.position.order)
        .map_err(|error| std::io::Error::other(error.to_string()))?;

    Ok(NewMember {
        name: seed.name.clone(),
        email,
        password_hash,
        account_role,
        family_role,
        profile_image: seed.profile_image.clone(),
        bio: seed.bio.clone(),
        social_links: SocialLinks {
            facebook: seed.social_links.facebook.clone(),
            instagram: seed.social_links.instagram.clone(),
            twitter: seed.social_links.twitter.clone(),
        },
        position,
    })
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let args = Args::parse();
    let database_url = args
        .database_url
        .or_else(|| std::env::var("FAMILY_TREE_DATABASE_URL").ok())
        .ok_or_else(|| {
            std::io::Error::other("--database-url or FAMILY_TREE_DATABASE_URL is required")
        })?;

    let household = match &args.household {
        Some(path) => Household::from_json(&std::fs::read_to_string(path)?)
            .map_err(|error| std::io::Error::other(error.to_string()))?,
        None => Household::demo(),
    };

    let migration_url = database_url.clone();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(|error| std::io::Error::other(format!("migration task failed: {error}")))?
        .map_err(|error| std::io::Error::other(error.to_string()))?;

    let pool = DbPool::connect(&database_url)
        .await
        .map_err(|error| std::io::Error::other(error.to_string()))?;
    let members = DieselMemberRepository::new(pool);
    let hasher = Argon2PasswordHasher;

    let mut inserted = 0usize;
    let mut skipped = 0usize;
    for seed in household.members() {
        let email = Email::new(&seed.email)
            .map_err(|error| std::io::Error::other(format!("{}: {error}", seed.email)))?;
        let existing = members
            .find_by_email(&email)
            .await
            .map_err(|error| std::io::Error::other(error.to_string()))?;
        if existing.is_some() {
            info!(email = %email, "already present, skipping");
            skipped += 1;
            continue;
        }

        let password_hash = hasher
            .hash(&seed.password)
            .map_err(|error| std::io::Error::other(error.to_string()))?;
        let member = members
            .create(seed_to_new_member(seed, password_hash)?)
            .await
            .map_err(|error| std::io::Error::other(error.to_string()))?;
        info!(member = %member.id(), email = %member.email(), "seeded");
        inserted += 1;
    }

    info!(inserted, skipped, "household seeding complete");
    Ok(())
}
