use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::Utc;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

const ID_BYTES: usize = 12;

static COUNTER: AtomicU32 = AtomicU32::new(0);

fn process_salt() -> &'static [u8; 5] {
    static SALT: OnceLock<[u8; 5]> = OnceLock::new();
    SALT.get_or_init(|| thread_rng().gen())
}

/// Opaque record identifier rendered as 24 lowercase hex chars.
///
/// Layout: 4 bytes of unix seconds, 5 bytes of per-process salt and a
/// 3 byte counter, so ids minted by one process sort in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new() -> Self {
        let mut bytes = [0u8; ID_BYTES];
        let secs = Utc::now().timestamp() as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_salt());
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        ObjectId(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        ObjectId::new()
    }
}

impl FromStr for ObjectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != ID_BYTES * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("malformed id: {s:?}"));
        }
        Ok(ObjectId(s.to_ascii_lowercase()))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
