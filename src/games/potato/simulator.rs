//! Balance simulator for Potato Land.
//! Run with: cargo test simulate_greedy -- --nocapture

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use crate::games::potato::catalog::Catalog;
    use crate::games::potato::farm::{Farm, TICKS_PER_SECOND};
    use crate::games::potato::logic::pending_prestige;
    use crate::games::potato::state::ProgressionState;

    /// Manual clicks per second the bot performs.
    const CLICKS_PER_SECOND: u32 = 5;

    /// Cheapest affordable upgrade that is not capped.
    fn cheapest_affordable(farm: &Farm) -> Option<&'static str> {
        farm.catalog
            .upgrades
            .iter()
            .filter(|u| !u.is_maxed() && farm.state.potatoes >= u.cost)
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
            .map(|u| u.id)
    }

    struct Report {
        seconds: u64,
        first_prestige_at: Option<u64>,
        purchases: u32,
    }

    /// One simulated second: clicks, one tick at a time, then buy greedily.
    fn run(farm: &mut Farm, max_seconds: u64) -> Report {
        let mut report = Report {
            seconds: 0,
            first_prestige_at: None,
            purchases: 0,
        };
        for second in 0..max_seconds {
            let before = farm.state.clone();

            for _ in 0..CLICKS_PER_SECOND {
                farm.click(false);
            }
            farm.tick(TICKS_PER_SECOND);
            while let Some(id) = cheapest_affordable(farm) {
                assert!(farm.buy(id));
                report.purchases += 1;
            }
            farm.drain_effects();

            let s = &farm.state;
            assert!(s.potatoes >= 0.0, "negative potatoes at {}s", second);
            assert!(s.total_potatoes >= before.total_potatoes);
            assert!(s.total_clicks > before.total_clicks);
            assert!(s.playtime > before.playtime);
            assert!(s.level >= before.level);
            assert!((0.0..=1.0).contains(&s.critical_chance));

            report.seconds = second + 1;
            if pending_prestige(s) > 0 {
                report.first_prestige_at = Some(second + 1);
                break;
            }
        }
        report
    }

    #[test]
    fn simulate_greedy() {
        let mut farm = Farm::with_roller(
            ProgressionState::new(0),
            Catalog::new(),
            SmallRng::seed_from_u64(42),
        );
        // Four simulated hours
        let report = run(&mut farm, 4 * 3600);

        println!(
            "seconds={} purchases={} level={} pps={:.1} first_prestige={:?}",
            report.seconds,
            report.purchases,
            farm.state.level,
            farm.state.potatoes_per_second,
            report.first_prestige_at
        );
        assert!(report.purchases > 0);
        assert!(
            report.first_prestige_at.is_some(),
            "no prestige after {}s",
            report.seconds
        );
    }

    #[test]
    fn prestige_cycle_keeps_invariants() {
        let mut farm = Farm::with_roller(
            ProgressionState::new(0),
            Catalog::new(),
            SmallRng::seed_from_u64(7),
        );
        let first = run(&mut farm, 4 * 3600);
        assert!(first.first_prestige_at.is_some());

        let clicks = farm.state.total_clicks;
        let achievements = farm.state.achievements.clone();
        let gain = farm.prestige(1).unwrap();
        assert!(gain >= 1);
        assert_eq!(farm.state.total_clicks, clicks);
        assert!(farm.state.achievements.is_superset(&achievements));
        assert_eq!(farm.catalog.distinct_owned(), 0);

        // The second run starts stronger, so it progresses.
        let second = run(&mut farm, 600);
        assert!(second.purchases > 0);
    }
}
