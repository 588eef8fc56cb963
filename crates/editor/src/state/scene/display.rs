//! Display helper functions for entities

use super::Entity;

/// Get display name for an entity, e.g. `Box (1a2b3c4d)`
pub fn entity_display_name(entity: &Entity) -> String {
    format!("{} ({})", entity.solid.kind().label(), short_id(&entity.id))
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Pose, Solid};

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("ёёёёёёёёёё"), "ёёёёёёёё");
    }

    #[test]
    fn test_entity_display_name() {
        let e = Entity::new(
            "0123456789".into(),
            Solid::Sphere { r: 1.0 },
            Pose::identity(),
        );
        assert_eq!(entity_display_name(&e), "Sphere (01234567)");
    }
}
