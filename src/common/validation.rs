// src/common/validation.rs
//
// Regras que o derive do `validator` não cobre: escolhas de enum vindas como
// texto, preço decimal e campos JSON que precisam ser objeto.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::error::{AppError, field_error};

// NUMERIC(10,2)
const PRICE_MAX_DIGITS: u32 = 10;
const PRICE_DECIMAL_PLACES: u32 = 2;

/// Roda o derive e devolve os erros acumulados (vazio quando está tudo ok),
/// para que as regras manuais possam somar campos ao mesmo relatório.
pub fn collect<T: Validate>(payload: &T) -> ValidationErrors {
    payload.validate().err().unwrap_or_default()
}

/// Fecha o relatório: sem erros é `Ok`, senão vira um único `AppError`.
pub fn finish(errors: ValidationErrors) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}

/// Campo obrigatório já conferido pelo derive; aqui só desembrulha.
pub fn required<T>(value: Option<T>, field: &'static str) -> Result<T, AppError> {
    value.ok_or_else(|| field_error(field, "required"))
}

/// Referência que não existe (ou está fora do escopo) vira `does_not_exist`.
pub fn reference(errors: &mut ValidationErrors, field: &'static str, found: bool) {
    if !found {
        errors.add(field, ValidationError::new("does_not_exist"));
    }
}

/// Interpreta um valor de enum vindo como texto. Valor desconhecido vira
/// `invalid_choice` no campo e o resultado é `None`.
pub fn choice<T: FromStr>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
) -> Option<T> {
    let value = value?;
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.add(field, ValidationError::new("invalid_choice"));
            None
        }
    }
}

/// Preço: >= 0, no máximo 2 casas e 10 dígitos.
pub fn price(errors: &mut ValidationErrors, field: &'static str, value: Option<&Decimal>) {
    let Some(value) = value else { return };

    if value.is_sign_negative() && !value.is_zero() {
        errors.add(field, ValidationError::new("min_value"));
        return;
    }
    let normalized = value.normalize();
    if normalized.scale() > PRICE_DECIMAL_PLACES {
        errors.add(field, ValidationError::new("max_decimal_places"));
        return;
    }
    // 10 dígitos no total com 2 de escala: a parte inteira cabe em 8
    let integer_part = normalized.trunc();
    let limit = Decimal::from(10_i64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES));
    if integer_part >= limit {
        errors.add(field, ValidationError::new("max_digits"));
    }
}

/// Campos JSONB (agenda, preferências) precisam ser objeto.
pub fn json_object(errors: &mut ValidationErrors, field: &'static str, value: Option<&Value>) {
    if let Some(value) = value {
        if !value.is_object() {
            errors.add(field, ValidationError::new("not_an_object"));
        }
    }
}

/// Arredonda para o formato gravado no banco.
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp(PRICE_DECIMAL_PLACES)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;
    use crate::models::staff::StaffRole;

    fn codes(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .field_errors()
            .get(field)
            .map(|errs| errs.iter().map(|e| e.code.to_string()).collect())
            .unwrap_or_default()
    }

    #[rstest]
    #[case("0", None)]
    #[case("35.00", None)]
    #[case("99999999.99", None)]
    #[case("-0.01", Some("min_value"))]
    #[case("1.234", Some("max_decimal_places"))]
    #[case("100000000", Some("max_digits"))]
    fn price_rules(#[case] raw: &str, #[case] expected: Option<&str>) {
        let mut errors = ValidationErrors::new();
        let value = Decimal::from_str(raw).unwrap();

        price(&mut errors, "price", Some(&value));

        let expected: Vec<String> = expected.into_iter().map(String::from).collect();
        assert_eq!(codes(&errors, "price"), expected);
    }

    #[test]
    fn trailing_zeros_do_not_count_as_decimal_places() {
        let mut errors = ValidationErrors::new();
        price(&mut errors, "price", Some(&Decimal::from_str("12.5000").unwrap()));
        assert!(errors.is_empty());
    }

    #[test]
    fn unknown_choice_is_reported_on_its_field() {
        let mut errors = ValidationErrors::new();

        let known: Option<StaffRole> = choice(&mut errors, "role", Some("manager"));
        let unknown: Option<StaffRole> = choice(&mut errors, "role", Some("janitor"));

        assert_eq!(known, Some(StaffRole::Manager));
        assert_eq!(unknown, None);
        assert_eq!(codes(&errors, "role"), vec!["invalid_choice"]);
    }

    #[test]
    fn json_fields_must_be_objects() {
        let mut errors = ValidationErrors::new();
        json_object(&mut errors, "schedule", Some(&serde_json::json!({"mon": "9-18"})));
        assert!(errors.is_empty());

        json_object(&mut errors, "schedule", Some(&serde_json::json!(["mon"])));
        assert_eq!(codes(&errors, "schedule"), vec!["not_an_object"]);
    }
}
