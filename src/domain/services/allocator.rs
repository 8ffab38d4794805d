//! First-come unique number allocation.
//!
//! Registrants are processed in arrival order. A free requested number is
//! granted as-is; a taken one is replaced by a uniform draw from the numbers
//! nobody holds yet. Missing or out-of-range requests are drawn the same way.
//! The set of taken numbers is an explicit accumulator threaded through the
//! loop, and the random source is supplied by the caller so a seeded
//! [`rand::rngs::StdRng`] gives reproducible output.

use crate::domain::model::{Assignment, NumberConflict, Registrant, Resolution};
use crate::utils::error::{EtlError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 99;
pub const POOL_CAPACITY: usize = (MAX_NUMBER - MIN_NUMBER + 1) as usize;

/// Numbers already handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedNumbers(BTreeSet<u8>);

impl UsedNumbers {
    pub fn contains(&self, number: u8) -> bool {
        self.0.contains(&number)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn available(&self) -> Vec<u8> {
        (MIN_NUMBER..=MAX_NUMBER)
            .filter(|number| !self.contains(*number))
            .collect()
    }

    fn claim(mut self, number: u8) -> Self {
        self.0.insert(number);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// One entry per registrant, in arrival order.
    pub assignments: Vec<Assignment>,
    pub conflicts: Vec<NumberConflict>,
}

impl Allocation {
    pub fn number_for(&self, name: &str) -> Option<u8> {
        self.assignments
            .iter()
            .find(|assignment| assignment.name == name)
            .map(|assignment| assignment.number)
    }
}

/// A request is only honored when it names a number inside the pool.
fn in_pool(requested: u32) -> Option<u8> {
    u8::try_from(requested)
        .ok()
        .filter(|number| (MIN_NUMBER..=MAX_NUMBER).contains(number))
}

fn draw_unused<R: Rng + ?Sized>(used: &UsedNumbers, name: &str, rng: &mut R) -> Result<u8> {
    used.available()
        .choose(rng)
        .copied()
        .ok_or_else(|| EtlError::NumberPoolExhausted {
            name: name.to_string(),
            assigned: used.len(),
            capacity: POOL_CAPACITY,
        })
}

fn assign_one<R: Rng + ?Sized>(
    used: UsedNumbers,
    registrant: &Registrant,
    rng: &mut R,
) -> Result<(UsedNumbers, Assignment)> {
    let name = registrant.name.as_str();

    let (number, resolution) = match registrant.requested_number {
        Some(requested) => match in_pool(requested) {
            Some(number) if !used.contains(number) => (number, Resolution::Granted),
            Some(_) => {
                let number = draw_unused(&used, name, rng)?;
                tracing::warn!(
                    "⚠️  Conflict: {} requested #{} but it was taken. Assigned #{}",
                    name,
                    requested,
                    number
                );
                (number, Resolution::Conflict { requested })
            }
            None => {
                let number = draw_unused(&used, name, rng)?;
                tracing::warn!(
                    "⚠️  {} requested #{}, outside {}-{}. Assigned #{}",
                    name,
                    requested,
                    MIN_NUMBER,
                    MAX_NUMBER,
                    number
                );
                (number, Resolution::Substituted)
            }
        },
        None => {
            let number = draw_unused(&used, name, rng)?;
            tracing::warn!("⚠️  Invalid number for {}, assigned random: {}", name, number);
            (number, Resolution::Substituted)
        }
    };

    let assignment = Assignment {
        name: name.to_string(),
        number,
        resolution,
    };
    Ok((used.claim(number), assignment))
}

/// Assign every registrant a distinct number in `MIN_NUMBER..=MAX_NUMBER`.
///
/// Input is sorted by `submission_order` (stable) before allocation, so the
/// earliest submission always keeps its requested number. Fails with
/// [`EtlError::NumberPoolExhausted`] once the pool runs dry.
pub fn allocate_numbers<R: Rng + ?Sized>(
    registrants: &[Registrant],
    rng: &mut R,
) -> Result<Allocation> {
    let mut arrival: Vec<&Registrant> = registrants.iter().collect();
    arrival.sort_by_key(|registrant| registrant.submission_order);

    let (_, allocation) = arrival.into_iter().try_fold(
        (UsedNumbers::default(), Allocation::default()),
        |(used, mut allocation), registrant| {
            let (used, assignment) = assign_one(used, registrant, &mut *rng)?;
            if let Resolution::Conflict { requested } = assignment.resolution {
                allocation.conflicts.push(NumberConflict {
                    name: assignment.name.clone(),
                    requested,
                    assigned: assignment.number,
                });
            }
            allocation.assignments.push(assignment);
            Ok::<_, EtlError>((used, allocation))
        },
    )?;

    Ok(allocation)
}
