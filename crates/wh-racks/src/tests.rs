//! Unit tests for wh-racks.

#[cfg(test)]
mod rack {
    use wh_core::{CellPos, RackId};

    use crate::{Rack, Transfer};

    #[test]
    fn new_rack_is_idle_and_changed() {
        let mut r = Rack::new(RackId(0), CellPos::new(1, 1));
        assert!(r.is_idle());
        assert_eq!(r.transfer(), Transfer::Idle);
        assert!(r.take_changed());
        assert!(!r.take_changed());
    }

    #[test]
    fn transfer_flags_are_exclusive() {
        let mut r = Rack::new(RackId(0), CellPos::new(1, 1));
        r.set_transfer(Transfer::FromTruck);
        assert!(r.is_from_truck() && !r.is_to_truck());
        r.set_transfer(Transfer::ToTruck);
        assert!(r.is_to_truck() && !r.is_from_truck());
        r.set_transfer(Transfer::Idle);
        assert!(!r.is_to_truck() && !r.is_from_truck());
    }

    #[test]
    fn busy_rack_is_not_idle() {
        let mut r = Rack::new(RackId(0), CellPos::new(1, 1));
        r.set_busy(true);
        assert!(!r.is_idle());
        r.set_busy(false);
        assert!(r.is_idle());
    }

    #[test]
    fn set_pos_marks_changed_only_on_move() {
        let mut r = Rack::new(RackId(0), CellPos::new(1, 1));
        r.take_changed();
        r.set_pos(CellPos::new(1, 1));
        assert!(!r.take_changed());
        r.set_pos(CellPos::new(2, 1));
        assert!(r.take_changed());
        assert_eq!(r.pos(), CellPos::new(2, 1));
    }
}

#[cfg(test)]
mod registry {
    use wh_core::{CellPos, RackId};

    use crate::{RackRegistry, RegistryError, Transfer};

    fn c(row: u32, col: u32) -> CellPos {
        CellPos::new(row, col)
    }

    #[test]
    fn ids_are_sequential_and_order_is_insertion() {
        let mut reg = RackRegistry::new();
        let a = reg.add_rack(c(3, 3)).unwrap();
        let b = reg.add_rack(c(0, 0)).unwrap();
        assert_eq!((a, b), (RackId(0), RackId(1)));
        let ids: Vec<_> = reg.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn one_rack_per_cell() {
        let mut reg = RackRegistry::new();
        let a = reg.add_rack(c(1, 1)).unwrap();
        assert_eq!(
            reg.add_rack(c(1, 1)),
            Err(RegistryError::CellTaken { cell: c(1, 1), existing: a })
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn remove_twice_is_noop() {
        let mut reg = RackRegistry::new();
        let a = reg.add_rack(c(1, 1)).unwrap();
        reg.add_rack(c(1, 2)).unwrap();
        assert!(reg.remove_rack(a).is_some());
        let after_first: Vec<_> = reg.iter().cloned().collect();
        assert!(reg.remove_rack(a).is_none());
        let after_second: Vec<_> = reg.iter().cloned().collect();
        assert_eq!(after_first, after_second);
        assert!(!reg.is_taken(c(1, 1)));
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut reg = RackRegistry::new();
        reg.add_rack(c(0, 0)).unwrap();
        assert!(reg.remove_rack(RackId(42)).is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn reinsert_keeps_id_and_moves_to_back() {
        let mut reg = RackRegistry::new();
        let a = reg.add_rack(c(0, 0)).unwrap();
        let b = reg.add_rack(c(0, 1)).unwrap();
        let mut rack = reg.remove_rack(a).unwrap();
        rack.set_pos(c(2, 2));
        assert_eq!(reg.insert(rack), Ok(a));
        let ids: Vec<_> = reg.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b, a]);
        assert_eq!(reg.rack_at(c(2, 2)).map(|r| r.id), Some(a));
        // Fresh ids never collide with reinserted ones.
        assert_eq!(reg.add_rack(c(3, 3)), Ok(RackId(2)));
    }

    #[test]
    fn relocate_updates_index() {
        let mut reg = RackRegistry::new();
        let a = reg.add_rack(c(0, 0)).unwrap();
        reg.add_rack(c(0, 1)).unwrap();
        assert_eq!(reg.relocate(a, c(1, 0)), Ok(true));
        assert!(!reg.is_taken(c(0, 0)));
        assert_eq!(reg.rack_at(c(1, 0)).map(|r| r.id), Some(a));
        assert!(reg.relocate(a, c(0, 1)).is_err());
        assert_eq!(reg.relocate(RackId(9), c(2, 2)), Ok(false));
    }

    #[test]
    fn transit_queries_follow_flags() {
        let mut reg = RackRegistry::new();
        let a = reg.add_rack(c(0, 0)).unwrap();
        let b = reg.add_from_truck(c(0, 1)).unwrap();
        assert_eq!(reg.racks_in_transit_to_truck().count(), 0);
        assert_eq!(reg.racks_from_truck().map(|r| r.id).collect::<Vec<_>>(), vec![b]);
        reg.set_transfer(a, Transfer::ToTruck);
        assert_eq!(reg.racks_in_transit_to_truck().map(|r| r.id).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn changed_flags_follow_moves() {
        let mut reg = RackRegistry::new();
        let a = reg.add_rack(c(0, 0)).unwrap();
        reg.add_rack(c(0, 1)).unwrap();
        assert_eq!(reg.iter_mut().map(|r| r.take_changed()).filter(|&changed| changed).count(), 2);
        assert_eq!(reg.iter_mut().map(|r| r.take_changed()).filter(|&changed| changed).count(), 0);
        reg.relocate(a, c(2, 2)).unwrap();
        let changed: Vec<_> = reg.iter_mut().filter_map(|r| r.take_changed().then_some(r.id)).collect();
        assert_eq!(changed, vec![a]);
        assert!(reg.index_is_consistent());
    }

    #[test]
    fn occupancy_tracks_membership() {
        let mut reg = RackRegistry::new();
        let a = reg.add_rack(c(1, 1)).unwrap();
        reg.add_rack(c(2, 3)).unwrap();
        let mut occ = reg.occupancy_bitmap(4, 4);
        assert!(occ.is_occupied(c(1, 1)));
        assert!(occ.is_occupied(c(2, 3)));
        assert_eq!(occ.occupied_count(), 2);

        reg.remove_rack(a);
        let v = occ.version();
        reg.rebuild_occupancy(&mut occ, [c(3, 3)]);
        assert!(!occ.is_occupied(c(1, 1)));
        assert!(occ.is_occupied(c(3, 3)));
        assert_eq!(occ.occupied_count(), 2);
        assert!(occ.version() > v);
    }
}
