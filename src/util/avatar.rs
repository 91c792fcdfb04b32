/// Stock portraits assigned to users that never uploaded an avatar.
pub const AVATARS: [&str; 6] = [
    "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg?auto=compress&cs=tinysrgb&w=150",
    "https://images.pexels.com/photos/415829/pexels-photo-415829.jpeg?auto=compress&cs=tinysrgb&w=150",
    "https://images.pexels.com/photos/1040880/pexels-photo-1040880.jpeg?auto=compress&cs=tinysrgb&w=150",
    "https://images.pexels.com/photos/1043471/pexels-photo-1043471.jpeg?auto=compress&cs=tinysrgb&w=150",
    "https://images.pexels.com/photos/1181686/pexels-photo-1181686.jpeg?auto=compress&cs=tinysrgb&w=150",
    "https://images.pexels.com/photos/1300402/pexels-photo-1300402.jpeg?auto=compress&cs=tinysrgb&w=150",
];

/// Used for transactions without a `user_profile` and for the demo account.
pub const DEFAULT_AVATAR: &str = AVATARS[0];

/// Picks a stable avatar for a display name.
///
/// The hash runs over UTF-16 code units with 32-bit wrapping arithmetic so
/// accounts created before the Rust backend keep the same picture.
pub fn avatar_for_name(name: &str) -> &'static str {
    let hash = name
        .encode_utf16()
        .fold(0i32, |acc, unit| acc.wrapping_shl(5).wrapping_sub(acc).wrapping_add(unit as i32));
    AVATARS[(hash.unsigned_abs() as usize) % AVATARS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_is_stable() {
        assert_eq!(avatar_for_name("Jane Doe"), avatar_for_name("Jane Doe"));
    }

    #[test]
    fn test_empty_name_uses_first_avatar() {
        assert_eq!(avatar_for_name(""), DEFAULT_AVATAR);
    }

    #[test]
    fn test_known_hashes() {
        // "A" hashes to 65, "AB" to 65 * 31 + 66 = 2081
        assert_eq!(avatar_for_name("A"), AVATARS[65 % 6]);
        assert_eq!(avatar_for_name("AB"), AVATARS[2081 % 6]);
    }

    #[test]
    fn test_long_name_wraps_without_panic() {
        let name = "x".repeat(10_000);
        assert!(AVATARS.contains(&avatar_for_name(&name)));
    }
}
