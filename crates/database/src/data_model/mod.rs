use std::fmt::Debug;

use model::WithId;
use serde::Serialize;
use utility::{
    geo::GeoPoint,
    id::{HasId, Id},
};

pub mod bus_stop;
pub mod incident;
pub mod taxi_rank;
pub mod user;

pub trait DatabaseRow {
    type Model: Serialize + HasId;

    fn get_id(&self) -> Id<Self::Model>;
    fn to_model(self) -> Self::Model;
}

pub fn with_ids<R: DatabaseRow>(rows: Vec<R>) -> Vec<WithId<R::Model>>
where
    <R::Model as HasId>::IdType: Debug + Clone + Serialize,
{
    rows.into_iter().map(|row| with_id(row)).collect::<Vec<_>>()
}

pub fn with_id<R: DatabaseRow>(row: R) -> WithId<R::Model>
where
    <R::Model as HasId>::IdType: Debug + Clone + Serialize,
{
    WithId::new(row.get_id(), row.to_model())
}

/// Rows store positions as two nullable columns. A half-filled pair counts as
/// no position.
pub(crate) fn location_of(latitude: Option<f64>, longitude: Option<f64>) -> Option<GeoPoint> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_needs_both_columns() {
        assert_eq!(
            location_of(Some(-26.2), Some(28.0)),
            Some(GeoPoint {
                latitude: -26.2,
                longitude: 28.0
            })
        );
        assert_eq!(location_of(Some(-26.2), None), None);
        assert_eq!(location_of(None, None), None);
    }
}
