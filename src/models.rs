pub mod appointment;
pub mod auth;
pub mod business;
pub mod customer;
pub mod service;
pub mod staff;

use serde::{Deserialize, Deserializer};

/// Distingue "campo ausente" de "campo enviado como null" em payloads de PATCH.
///
/// Use com `#[serde(default, deserialize_with = "crate::models::nullable")]`:
/// ausente vira `None`, `null` vira `Some(None)` e um valor vira `Some(Some(v))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Aplica um campo de PATCH sobre o valor atual.
pub fn apply<T>(target: &mut T, change: Option<T>) {
    if let Some(value) = change {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::nullable")]
        email: Option<Option<String>>,
    }

    #[test]
    fn nullable_distinguishes_absent_from_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"email": null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"email": "a@b.com"}"#).unwrap();

        assert_eq!(absent.email, None);
        assert_eq!(null.email, Some(None));
        assert_eq!(value.email, Some(Some("a@b.com".to_string())));
    }
}
