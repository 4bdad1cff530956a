//! Catálogo de intervalos de mantenimiento
//!
//! Resuelve qué IntervalDefinition aplican a un vehículo concreto,
//! ordenados del más específico al más genérico. Función pura sobre el
//! catálogo cargado: sin efectos secundarios.

use crate::models::IntervalDefinition;

/// Definiciones activas aplicables a una marca/modelo, la más específica
/// primero: (marca+modelo) > (marca) > global. Lista vacía si ninguna aplica.
pub fn applicable_intervals<'a>(
    catalog: &'a [IntervalDefinition],
    make: &str,
    model: &str,
) -> Vec<&'a IntervalDefinition> {
    let mut applicable: Vec<&IntervalDefinition> = catalog
        .iter()
        .filter(|def| def.is_active && def.matches(make, model))
        .collect();

    // sort estable: a igual especificidad se conserva el orden del catálogo
    applicable.sort_by(|a, b| b.specificity().cmp(&a.specificity()));
    applicable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntervalType;
    use uuid::Uuid;

    fn def(
        name: &str,
        make: Option<&str>,
        model: Option<&str>,
        is_active: bool,
    ) -> IntervalDefinition {
        IntervalDefinition {
            id: Uuid::new_v4(),
            name: name.to_string(),
            interval_type: IntervalType::Both,
            mileage_interval: Some(10_000),
            time_interval_days: Some(365),
            car_make: make.map(|s| s.to_string()),
            car_model: model.map(|s| s.to_string()),
            is_active,
        }
    }

    #[test]
    fn test_most_specific_first() {
        let catalog = vec![
            def("global", None, None, true),
            def("por marca", Some("Renault"), None, true),
            def("por marca y modelo", Some("Renault"), Some("Clio"), true),
        ];

        let result = applicable_intervals(&catalog, "Renault", "Clio");
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].name, "por marca y modelo");
        assert_eq!(result[1].name, "por marca");
        assert_eq!(result[2].name, "global");
    }

    #[test]
    fn test_non_matching_scope_excluded() {
        let catalog = vec![
            def("global", None, None, true),
            def("otra marca", Some("Peugeot"), None, true),
            def("otro modelo", Some("Renault"), Some("Megane"), true),
        ];

        let result = applicable_intervals(&catalog, "Renault", "Clio");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "global");
    }

    #[test]
    fn test_inactive_excluded() {
        let catalog = vec![def("inactivo", None, None, false)];
        assert!(applicable_intervals(&catalog, "Renault", "Clio").is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(applicable_intervals(&[], "Renault", "Clio").is_empty());
    }
}
