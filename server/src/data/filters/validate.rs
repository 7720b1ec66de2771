//! Filter validation
//!
//! Drops entries that would produce no constraint before predicate building.

use super::types::Filter;

/// Keep filters that carry an operand, plus every emptiness check
///
/// Pure and order-preserving; applying it twice yields the same list.
pub fn get_valid_filters(filters: &[Filter]) -> Vec<Filter> {
    filters
        .iter()
        .filter(|f| f.operator.is_emptiness() || !f.value.is_empty())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filters::{ColumnVariant, FilterOperator, FilterValue};

    fn filter(id: &str, value: FilterValue, operator: FilterOperator) -> Filter {
        Filter::new(id, value, ColumnVariant::Text, operator)
    }

    fn sample() -> Vec<Filter> {
        vec![
            filter("title", FilterValue::Scalar("a".into()), FilterOperator::ILike),
            filter("title", FilterValue::Empty, FilterOperator::Eq),
            filter("code", FilterValue::Scalar(String::new()), FilterOperator::Ne),
            filter("title", FilterValue::Empty, FilterOperator::IsEmpty),
            Filter::new(
                "status",
                FilterValue::MultiSelect(vec![]),
                ColumnVariant::MultiSelect,
                FilterOperator::Eq,
            ),
            filter("code", FilterValue::Scalar("b".into()), FilterOperator::IsNotEmpty),
        ]
    }

    #[test]
    fn drops_empty_operands() {
        let valid = get_valid_filters(&sample());
        let ids: Vec<_> = valid.iter().map(|f| f.operator).collect();
        assert_eq!(
            ids,
            vec![
                FilterOperator::ILike,
                FilterOperator::IsEmpty,
                FilterOperator::IsNotEmpty
            ]
        );
    }

    #[test]
    fn is_idempotent() {
        let once = get_valid_filters(&sample());
        let twice = get_valid_filters(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn emptiness_checks_always_retained() {
        for value in [
            FilterValue::Empty,
            FilterValue::Scalar(String::new()),
            FilterValue::MultiSelect(vec![]),
            FilterValue::Scalar("ignored".into()),
        ] {
            for op in [FilterOperator::IsEmpty, FilterOperator::IsNotEmpty] {
                let f = filter("title", value.clone(), op);
                assert_eq!(get_valid_filters(std::slice::from_ref(&f)), vec![f]);
            }
        }
    }

    #[test]
    fn input_is_untouched() {
        let input = sample();
        let before = input.clone();
        let _ = get_valid_filters(&input);
        assert_eq!(input, before);
    }
}
