//! Channel topology for the halo exchange protocol.
//!
//! Adjacent bands are wired with dedicated channels per direction, plus a
//! separate one-shot channel for the post-smoothing boundary-row borrow so
//! it can never be confused with an iteration exchange. Bands at the global
//! edges simply have no link on that side; the absence itself is the
//! edge marker.

use crossbeam_channel::{unbounded, Receiver, Sender};

use karst_core::Cell;

/// One boundary row in flight, stamped with the smoothing iteration that
/// produced it. The receiver verifies the stamp; a skewed tag means the
/// barrier discipline broke and the run must abort.
#[derive(Debug)]
pub(crate) struct HaloMessage {
    pub iteration: u32,
    pub row: Vec<Cell>,
}

/// One worker's endpoints to its neighbors.
///
/// `None` on any side means "no neighbor there": for the first and last
/// active bands, and on every side of a starved band.
#[derive(Debug, Default)]
pub(crate) struct NeighborLinks {
    /// Halo rows to the previous band (this band's first row).
    pub to_prev: Option<Sender<HaloMessage>>,
    /// Halo rows from the previous band (its last row, our top halo).
    pub from_prev: Option<Receiver<HaloMessage>>,
    /// Halo rows to the next band (this band's last row).
    pub to_next: Option<Sender<HaloMessage>>,
    /// Halo rows from the next band (its first row, our bottom halo).
    pub from_next: Option<Receiver<HaloMessage>>,
    /// One-shot borrow of this band's first row by the previous band.
    pub borrow_to_prev: Option<Sender<Vec<Cell>>>,
    /// One-shot borrow of the next band's first row for extraction.
    pub borrow_from_next: Option<Receiver<Vec<Cell>>>,
}

/// Wires `active` adjacent bands together.
///
/// Callers pass only the count of non-starved bands; starved bands are
/// always a suffix of the worker list and take default (unlinked)
/// endpoints.
pub(crate) fn link_bands(active: usize) -> Vec<NeighborLinks> {
    let mut links: Vec<NeighborLinks> = (0..active).map(|_| NeighborLinks::default()).collect();

    for i in 1..active {
        let (up_tx, up_rx) = unbounded();
        links[i].to_prev = Some(up_tx);
        links[i - 1].from_next = Some(up_rx);

        let (down_tx, down_rx) = unbounded();
        links[i - 1].to_next = Some(down_tx);
        links[i].from_prev = Some(down_rx);

        let (borrow_tx, borrow_rx) = unbounded();
        links[i].borrow_to_prev = Some(borrow_tx);
        links[i - 1].borrow_from_next = Some(borrow_rx);
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_bands_have_no_outer_links() {
        let links = link_bands(3);
        assert!(links[0].to_prev.is_none());
        assert!(links[0].from_prev.is_none());
        assert!(links[2].to_next.is_none());
        assert!(links[2].from_next.is_none());
        assert!(links[2].borrow_from_next.is_none());
    }

    #[test]
    fn interior_bands_are_fully_linked() {
        let links = link_bands(3);
        assert!(links[1].to_prev.is_some());
        assert!(links[1].from_prev.is_some());
        assert!(links[1].to_next.is_some());
        assert!(links[1].from_next.is_some());
        assert!(links[1].borrow_to_prev.is_some());
        assert!(links[1].borrow_from_next.is_some());
    }

    #[test]
    fn rows_flow_between_neighbors() {
        let mut links = link_bands(2);
        let row = vec![Cell::Wall, Cell::Open];

        links[1]
            .to_prev
            .as_ref()
            .unwrap()
            .send(HaloMessage { iteration: 0, row: row.clone() })
            .unwrap();
        let received = links[0].from_next.as_mut().unwrap().recv().unwrap();
        assert_eq!(received.iteration, 0);
        assert_eq!(received.row, row);
    }

    #[test]
    fn single_band_needs_no_links() {
        let links = link_bands(1);
        assert_eq!(links.len(), 1);
        assert!(links[0].from_prev.is_none() && links[0].from_next.is_none());
    }
}
