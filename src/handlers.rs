pub mod appointments;
pub mod auth;
pub mod businesses;
pub mod customers;
pub mod health;
pub mod services;
pub mod staff;

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{
    common::{
        error::AppError,
        validation::{choice, finish},
    },
    db::ListFilter,
    models::appointment::AppointmentStatus,
};

/// Filtros aceitos nas listagens (`?business=<uuid>&status=<status>`).
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListFilterQuery {
    pub business: Option<Uuid>,
    /// Só para agendamentos.
    pub status: Option<String>,
}

impl ListFilterQuery {
    pub fn into_filter(self) -> Result<ListFilter, AppError> {
        let mut errors = ValidationErrors::new();
        let status = choice::<AppointmentStatus>(&mut errors, "status", self.status.as_deref());
        finish(errors)?;
        Ok(ListFilter {
            business: self.business,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_filter_is_a_field_error() {
        let query = ListFilterQuery {
            business: None,
            status: Some("finished".into()),
        };
        let Err(AppError::ValidationError(errors)) = query.into_filter() else {
            panic!("expected a validation error");
        };
        assert!(errors.field_errors().contains_key("status"));
    }

    #[test]
    fn known_status_filter_is_parsed() {
        let query = ListFilterQuery {
            business: None,
            status: Some("no_show".into()),
        };
        assert_eq!(
            query.into_filter().unwrap().status,
            Some(AppointmentStatus::NoShow)
        );
    }
}
