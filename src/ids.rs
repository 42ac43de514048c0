use log::warn;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use uuid::Builder;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const FALLBACK_LEN: usize = 8;
const MAX_ATTEMPTS: usize = 16;

/// Lowercased title with every whitespace run collapsed to a single `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_space = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    slug
}

/// UUID v4 from the OS entropy source, or a short base-36 string when that
/// source is unavailable.
pub fn random_suffix() -> String {
    let mut bytes = [0u8; 16];
    let filled = OsRng.try_fill_bytes(&mut bytes);
    suffix_from(filled, bytes)
}

fn suffix_from(filled: Result<(), rand::Error>, bytes: [u8; 16]) -> String {
    match filled {
        Ok(()) => Builder::from_random_bytes(bytes).into_uuid().to_string(),
        Err(err) => {
            warn!("os random source unavailable ({}), using short id suffix", err);
            base36_suffix(FALLBACK_LEN)
        }
    }
}

pub fn base36_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Builds `slug-suffix`, redrawing the suffix while `is_taken` reports a clash.
pub fn note_id_for(title: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let slug = slugify(title);
    for _ in 0..MAX_ATTEMPTS {
        let id = format!("{}-{}", slug, random_suffix());
        if !is_taken(&id) {
            return id;
        }
    }
    // Only reachable with a broken random source; lengthen until free.
    let mut len = FALLBACK_LEN * 2;
    loop {
        let id = format!("{}-{}", slug, base36_suffix(len));
        if !is_taken(&id) {
            return id;
        }
        len += 1;
    }
}
