//! Unit tests for wh-bay.

#[cfg(test)]
mod helpers {
    use wh_core::{CellPos, RackId, TruckConfig};
    use wh_racks::{Rack, Transfer};

    /// Short road: bay two steps away, road two steps beyond.
    pub fn short_road() -> TruckConfig {
        TruckConfig {
            capacity:       3,
            lanes_x:        vec![10.0],
            start_z:        0.0,
            bay_z:          -2.0,
            road_z:         -4.0,
            speed:          1.0,
            arrive_epsilon: 0.5,
            initial_racks:  2,
        }
    }

    pub fn outbound_rack(id: u32) -> Rack {
        let mut rack = Rack::new(RackId(id), CellPos::new(25, id));
        rack.set_transfer(Transfer::ToTruck);
        rack
    }
}

#[cfg(test)]
mod truck {
    use wh_core::{TruckConfig, TruckId};

    use super::helpers::short_road;
    use crate::{Truck, TruckEvent, TruckState};

    #[test]
    fn full_fires_once_and_counter_is_clamped() {
        let mut truck = Truck::new(TruckId(0), 10.0, &TruckConfig::default());
        assert_eq!(truck.capacity(), 30);

        for _ in 0..30 {
            assert!(truck.add_package());
        }
        assert!(!truck.add_package(), "31st package must be rejected");
        assert_eq!(truck.packages(), 30);

        let events: Vec<_> = truck.drain_events().collect();
        assert_eq!(events, vec![TruckEvent::Full { truck: TruckId(0) }]);
    }

    #[test]
    fn drives_then_arrives_without_moving() {
        let mut truck = Truck::new(TruckId(0), 10.0, &short_road());
        truck.step();
        assert_eq!(truck.world_pos().z, -1.0);
        truck.step();
        assert_eq!(truck.world_pos().z, -2.0);
        assert_eq!(truck.state(), TruckState::DrivingToBay);
        truck.take_changed();

        truck.step();
        assert_eq!(truck.state(), TruckState::Loading);
        assert_eq!(truck.world_pos().z, -2.0);
        assert!(!truck.take_changed());
    }

    #[test]
    fn unloading_at_bay_raises_available() {
        let mut truck = Truck::new(TruckId(4), 10.0, &short_road());
        for _ in 0..4 {
            truck.step();
        }
        assert_eq!(truck.racks(), 1);
        assert_eq!(truck.drain_events().count(), 0);

        truck.step();
        assert_eq!(truck.state(), TruckState::AtBayUnloaded);
        assert!(truck.is_bay_controlled());
        let events: Vec<_> = truck.drain_events().collect();
        assert_eq!(events, vec![TruckEvent::Available { truck: TruckId(4), delivered: 2 }]);

        // Bay-controlled trucks wait.
        truck.step();
        assert_eq!(truck.state(), TruckState::AtBayUnloaded);
    }

    #[test]
    fn road_visit_empties_and_refills() {
        let mut truck = Truck::new(TruckId(0), 10.0, &short_road());
        for _ in 0..5 {
            truck.step();
        }
        truck.add_package();
        truck.add_package();
        truck.send_to_road();
        assert!(!truck.is_bay_controlled());

        // Two moves, one arrival tick.
        for _ in 0..3 {
            truck.step();
        }
        assert_eq!(truck.state(), TruckState::AtRoad);
        truck.step();
        assert_eq!(truck.packages(), 1);
        truck.step();
        assert_eq!(truck.packages(), 0);
        assert_eq!(truck.racks(), 3);
        assert_eq!(truck.state(), TruckState::DrivingToBay);
    }

    #[test]
    fn empty_truck_at_road_turns_around_at_once() {
        let mut truck = Truck::new(TruckId(0), 10.0, &short_road());
        for _ in 0..5 {
            truck.step();
        }
        truck.send_to_road();
        for _ in 0..3 {
            truck.step();
        }
        assert_eq!(truck.state(), TruckState::AtRoad);
        truck.step();
        assert_eq!(truck.state(), TruckState::DrivingToBay);
    }
}

#[cfg(test)]
mod bay {
    use wh_core::{TruckConfig, TruckId};

    use super::helpers::{outbound_rack, short_road};
    use crate::{Bay, TruckState};

    fn docked_bay() -> Bay {
        let mut bay = Bay::new(&short_road());
        for _ in 0..5 {
            bay.step();
        }
        bay
    }

    #[test]
    fn one_truck_per_lane() {
        let bay = Bay::new(&TruckConfig::default());
        assert_eq!(bay.trucks().len(), 2);
        assert_eq!(bay.trucks()[1].world_pos().x, 20.0);
        assert!(!bay.has_docked_truck());
    }

    #[test]
    fn available_truck_docks_and_counts_racks() {
        let bay = docked_bay();
        assert_eq!(bay.docked(), &[TruckId(0)]);
        assert_eq!(bay.pending_racks(), 2);
    }

    #[test]
    fn delivered_racks_are_taken_one_at_a_time() {
        let mut bay = docked_bay();
        assert!(bay.take_delivered_rack());
        assert!(bay.take_delivered_rack());
        assert!(!bay.take_delivered_rack());
        assert_eq!(bay.pending_racks(), 0);
    }

    #[test]
    fn no_loading_without_docked_truck() {
        let mut bay = Bay::new(&short_road());
        bay.stage_package(outbound_rack(0));
        assert!(bay.step().is_none());
        assert_eq!(bay.packages(), 1);
    }

    #[test]
    fn loads_one_package_per_tick_then_dispatches() {
        let mut bay = docked_bay();
        for id in 0..4 {
            bay.stage_package(outbound_rack(id));
        }

        let loaded: Vec<_> = (0..3).filter_map(|_| bay.step()).map(|r| r.id.0).collect();
        assert_eq!(loaded, vec![0, 1, 2]);

        let truck = bay.truck(TruckId(0)).expect("truck 0");
        assert_eq!(truck.packages(), 3);
        assert_eq!(truck.state(), TruckState::DrivingToRoad);
        assert!(!bay.has_docked_truck());

        // The fourth package waits for the next truck.
        assert!(bay.step().is_none());
        assert_eq!(bay.packages(), 1);
    }

    #[test]
    fn truck_returns_with_a_full_load_of_racks() {
        let mut bay = docked_bay();
        while bay.take_delivered_rack() {}
        bay.send_truck_to_road(TruckId(0));

        // 2 moves + arrival, 1 tick at the road, 2 moves + arrival back at
        // the bay, 3 racks unloaded.
        let mut ticks = 0;
        while !bay.has_docked_truck() {
            bay.step();
            ticks += 1;
            assert!(ticks < 50, "truck never came back");
        }
        assert_eq!(bay.pending_racks(), 3);
    }

    #[test]
    fn counters_stay_within_capacity() {
        let mut bay = Bay::new(&short_road());
        for id in 0..20 {
            bay.stage_package(outbound_rack(id));
        }
        for _ in 0..200 {
            bay.step();
            while bay.take_delivered_rack() {}
            for truck in bay.trucks() {
                assert!(truck.packages() <= truck.capacity());
            }
        }
        assert_eq!(bay.packages(), 0);
    }

    #[test]
    fn moving_trucks_are_reported_changed() {
        let mut bay = Bay::new(&TruckConfig::default());
        assert_eq!(bay.trucks_mut().map(|t| t.take_changed()).filter(|&changed| changed).count(), 2);
        bay.step();
        assert_eq!(bay.trucks_mut().map(|t| t.take_changed()).filter(|&changed| changed).count(), 2);
        assert_eq!(bay.trucks_mut().map(|t| t.take_changed()).filter(|&changed| changed).count(), 0);
    }
}
