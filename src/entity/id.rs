use uuid::Uuid;

/// Length of generated entity ids.
pub const ID_LEN: usize = 9;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a short base-36 id.
///
/// Ids are 9 lowercase alphanumeric characters drawn from the random bits of a
/// v4 UUID. They are not globally unique; callers that need uniqueness within
/// a collection use [`generate_unique_id`].
pub fn generate_id() -> String {
    let mut n = Uuid::new_v4().as_u128();
    let mut out = [0u8; ID_LEN];
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(n % 36) as usize];
        n /= 36;
    }
    // ALPHABET is ASCII
    out.iter().map(|&b| b as char).collect()
}

/// Generate an id that `taken` does not report as already in use.
pub fn generate_unique_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = generate_id();
        if !taken(&id) {
            return id;
        }
        tracing::debug!(id = %id, "generated id collided, re-rolling");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;

    #[test]
    fn test_generated_id_shape() {
        for _ in 0..100 {
            let id = generate_id();
            assert_eq!(id.len(), ID_LEN);
            assert!(id
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids: HashSet<String> = (0..5000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 5000);
    }

    #[test]
    fn test_unique_id_rerolls_until_free() {
        let calls = Cell::new(0);
        let id = generate_unique_id(|_| {
            calls.set(calls.get() + 1);
            calls.get() < 3
        });
        assert_eq!(calls.get(), 3);
        assert_eq!(id.len(), ID_LEN);
    }
}
