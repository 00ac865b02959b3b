//! Pairwise effective-distance matrix for one optimization run.

use rayon::prelude::*;
use serde::Serialize;

use crate::distance::TrafficModel;
use crate::stop::Stop;

/// One directed leg of the matrix.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MatrixEntry {
    /// Routing cost: base distance times complexity factor.
    pub effective_km: f64,
    pub base_distance_km: f64,
    pub complexity_factor: f64,
    pub estimated_time_hours: f64,
    pub notes: Vec<String>,
}

/// Square matrix indexed by stop position. Immutable once built.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    rows: Vec<Vec<MatrixEntry>>,
}

impl DistanceMatrix {
    /// Computes every ordered pair. Rows are built in parallel; each cell
    /// only reads the two stops involved.
    pub fn build(stops: &[&Stop], model: &TrafficModel) -> Self {
        let rows = (0..stops.len())
            .into_par_iter()
            .map(|i| {
                (0..stops.len())
                    .map(|j| {
                        if i == j {
                            return MatrixEntry::default();
                        }
                        let (effective_km, info) = model.effective_distance(stops[i], stops[j]);
                        MatrixEntry {
                            effective_km,
                            base_distance_km: info.base_distance_km,
                            complexity_factor: info.complexity_factor,
                            estimated_time_hours: info.estimated_time_hours,
                            notes: info.notes,
                        }
                    })
                    .collect()
            })
            .collect();

        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn entry(&self, from: usize, to: usize) -> &MatrixEntry {
        &self.rows[from][to]
    }

    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.rows[from][to].effective_km
    }

    /// Sum of consecutive-pair costs along an open path.
    pub fn path_cost(&self, path: &[usize]) -> f64 {
        path.windows(2).map(|leg| self.cost(leg[0], leg[1])).sum()
    }
}
