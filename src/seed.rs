//! Random demo data.
//!
//! Fills storage with generated users and messages. The same seed always
//! produces the same users and messages.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use crate::mail::{Message, MessageStore};
use crate::storage::Storage;
use crate::user::{User, UserDirectory};
use crate::{RelayError, Result};

/// Number of users generated per population run.
pub const SEED_USERS: usize = 10;

/// Number of messages generated per population run.
pub const SEED_MESSAGES: usize = 20;

const FIRST_NAMES: &[&str] = &[
    "Ivan", "Maria", "John", "Olga", "Bob", "Alice", "Petr", "Eva", "Sergey", "Anna",
];

const LAST_NAMES: &[&str] = &[
    "Pupkin", "Smith", "Ivanova", "Snow", "Petrov", "Brown", "Sidorov", "Miller",
];

const DOMAINS: &[&str] = &["example.org", "mail.test", "hse.test", "relay.local"];

const SUBJECTS: &[&str] = &[
    "Hello",
    "Meeting tomorrow",
    "Re: lunch",
    "Homework",
    "Weekly report",
    "Quick question",
];

const BODIES: &[&str] = &[
    "Hi!\nHow are you?\n",
    "See you at 10.\n",
    "Please find the details below.\n",
    "Thanks a lot!\n",
    "Can we talk later today?\n",
];

/// Counts of records created by [`populate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    /// Users registered.
    pub users: usize,
    /// Messages stored.
    pub messages: usize,
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn random_user(rng: &mut StdRng) -> User {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let number: u32 = rng.random_range(1..1000);
    let domain = pick(rng, DOMAINS);

    User::new(
        format!("{first} {last}"),
        format!(
            "{}.{}{number}@{domain}",
            first.to_lowercase(),
            last.to_lowercase()
        ),
    )
}

/// Parse a seed from request text.
///
/// Blank text means "no seed"; anything else must be a decimal `u64`.
pub fn parse_seed(text: &str) -> Result<Option<u64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<u64>()
        .map(Some)
        .map_err(|_| RelayError::InvalidSeed(text.to_string()))
}

/// Register generated users and store generated messages between them.
///
/// Generated emails that are already taken are not registered again but still
/// take part in messages.
pub async fn populate(storage: &Storage, seed: u64) -> Result<SeedSummary> {
    let mut rng = StdRng::seed_from_u64(seed);
    let directory = UserDirectory::new(storage);
    let store = MessageStore::new(storage);
    let mut summary = SeedSummary::default();

    let mut emails = Vec::with_capacity(SEED_USERS);
    for _ in 0..SEED_USERS {
        let user = random_user(&mut rng);
        let email = user.email.clone();
        match directory.register(user).await {
            Ok(()) => summary.users += 1,
            Err(RelayError::DuplicateEmail(_)) => {}
            Err(e) => return Err(e),
        }
        emails.push(email);
    }

    for _ in 0..SEED_MESSAGES {
        let sender = emails[rng.random_range(0..emails.len())].clone();
        let receiver = emails[rng.random_range(0..emails.len())].clone();
        let message = Message::new(pick(&mut rng, SUBJECTS), pick(&mut rng, BODIES), sender, receiver);
        store.append(message).await?;
        summary.messages += 1;
    }

    info!(
        seed,
        users = summary.users,
        messages = summary.messages,
        "Storage populated"
    );
    Ok(summary)
}
