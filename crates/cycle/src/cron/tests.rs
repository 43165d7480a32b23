//! Tests for the cron cycle search.

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use wfm_core::time::{max_time, min_time, utc};
    use wfm_core::ConfigError;

    use crate::cron::CronCycle;
    use crate::spec::CycleSpec;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        utc(y, mo, d, h, mi).unwrap()
    }

    fn cron(fields: [&str; 6]) -> CronCycle {
        CronCycle::new("test", fields).unwrap()
    }

    /// Deterministic reference times spread over several years.
    fn sample_times() -> Vec<DateTime<Utc>> {
        let mut t = at(2008, 12, 25, 3, 17);
        let mut out = Vec::new();
        while t < at(2013, 3, 1, 0, 0) {
            out.push(t);
            t += Duration::minutes(7 * 24 * 60 + 13 * 60 + 29);
        }
        out
    }

    // -- next ---------------------------------------------------------------

    #[test]
    fn next_day_or_weekday_wraps_past_february() {
        let c = cron(["0", "0,12", "3-31", "2", "*", "6"]);
        let next = c.next(at(2009, 2, 28, 15, 43), false).unwrap();
        assert_eq!(next.cycle, at(2010, 2, 3, 0, 0));
    }

    #[test]
    fn next_finds_leap_day() {
        let c = cron(["0", "0,12", "29-31", "2", "*", "*"]);
        let next = c.next(at(2009, 3, 28, 15, 43), false).unwrap();
        assert_eq!(next.cycle, at(2012, 2, 29, 0, 0));
    }

    #[test]
    fn next_carries_across_year_boundary() {
        let c = cron(["0", "0", "*", "*", "*", "*"]);
        let next = c.next(at(2010, 12, 31, 18, 0), false).unwrap();
        assert_eq!(next.cycle, at(2011, 1, 1, 0, 0));
    }

    #[test]
    fn next_skips_days_missing_from_short_months() {
        let c = cron(["30", "6", "31", "*", "*", "*"]);
        assert_eq!(
            c.next(at(2011, 4, 1, 0, 0), false).unwrap().cycle,
            at(2011, 5, 31, 6, 30)
        );
    }

    #[test]
    fn next_weekday_only() {
        // 2011-01-01 was a Saturday.
        let c = cron(["0", "0", "*", "*", "*", "0"]);
        assert_eq!(
            c.next(at(2011, 1, 1, 0, 1), false).unwrap().cycle,
            at(2011, 1, 2, 0, 0)
        );
    }

    #[test]
    fn next_day_or_weekday_takes_the_earlier_match() {
        // First of the month OR Mondays; 2011-01-03 is a Monday.
        let c = cron(["0", "0", "1", "*", "*", "1"]);
        assert_eq!(
            c.next(at(2011, 1, 1, 0, 1), false).unwrap().cycle,
            at(2011, 1, 3, 0, 0)
        );
        // From a Tuesday, the next match is the following Monday, 2011-01-10.
        assert_eq!(
            c.next(at(2011, 1, 4, 0, 0), false).unwrap().cycle,
            at(2011, 1, 10, 0, 0)
        );
        // Late January: the first of February (a Tuesday) wins.
        assert_eq!(
            c.next(at(2011, 1, 31, 0, 1), false).unwrap().cycle,
            at(2011, 2, 1, 0, 0)
        );
    }

    #[test]
    fn next_rounds_partial_minutes_up() {
        let c = cron(["*", "*", "*", "*", "*", "*"]);
        let t = Utc.with_ymd_and_hms(2011, 1, 1, 0, 0, 30).unwrap();
        assert_eq!(c.next(t, false).unwrap().cycle, at(2011, 1, 1, 0, 1));
        assert_eq!(c.previous(t, false).unwrap().cycle, at(2011, 1, 1, 0, 0));
    }

    #[test]
    fn next_is_none_once_years_run_out() {
        let c = cron(["0", "0", "*", "*", "2011", "*"]);
        assert_eq!(c.next(at(2012, 1, 1, 0, 0), false), None);
        assert_eq!(c.next(at(2011, 12, 31, 0, 1), false), None);
        assert_eq!(
            c.next(at(2011, 12, 31, 0, 0), false).unwrap().cycle,
            at(2011, 12, 31, 0, 0)
        );
    }

    #[test]
    fn next_is_none_when_date_never_exists() {
        let c = cron(["0", "0", "30", "2", "*", "*"]);
        assert_eq!(c.next(at(2011, 1, 1, 0, 0), false), None);
        assert_eq!(c.previous(at(2011, 1, 1, 0, 0), false), None);
    }

    #[test]
    fn next_beyond_representable_range() {
        let c = cron(["*", "*", "*", "*", "*", "*"]);
        assert_eq!(c.next(max_time() + Duration::hours(1), false), None);
        assert_eq!(c.previous(min_time() - Duration::days(1), false), None);
        assert_eq!(c.next(at(1860, 1, 1, 0, 0), false).unwrap().cycle, min_time());
    }

    #[test]
    fn next_from_the_last_chrono_instant_is_none() {
        let c = cron(["*", "*", "*", "*", "*", "*"]);
        assert_eq!(c.next(DateTime::<Utc>::MAX_UTC, false), None);
        assert_eq!(c.next(DateTime::<Utc>::MAX_UTC, true), None);
        assert_eq!(
            c.previous(DateTime::<Utc>::MAX_UTC, false).unwrap().cycle,
            max_time()
        );
    }

    #[test]
    fn years_before_1970_are_valid() {
        let c = CronCycle::parse("historic", "0 12 1 1 1950-1960 *").unwrap();
        assert_eq!(c.first().unwrap().cycle, at(1950, 1, 1, 12, 0));
        assert_eq!(c.last().unwrap().cycle, at(1960, 1, 1, 12, 0));
        assert_eq!(c.all().unwrap().len(), 11);
        assert_eq!(
            c.previous(at(1955, 6, 1, 0, 0), false).unwrap().cycle,
            at(1955, 1, 1, 12, 0)
        );
    }

    // -- previous -----------------------------------------------------------

    #[test]
    fn previous_mirrors_day_or_weekday() {
        let c = cron(["0", "0,12", "3-31", "2", "*", "6"]);
        assert_eq!(
            c.previous(at(2010, 2, 2, 23, 59), false).unwrap().cycle,
            at(2009, 2, 28, 12, 0)
        );
    }

    #[test]
    fn previous_finds_leap_day() {
        let c = cron(["0", "0,12", "29-31", "2", "*", "*"]);
        assert_eq!(
            c.previous(at(2015, 6, 1, 0, 0), false).unwrap().cycle,
            at(2012, 2, 29, 12, 0)
        );
    }

    #[test]
    fn previous_carries_across_year_boundary() {
        let c = cron(["0", "18", "*", "*", "*", "*"]);
        assert_eq!(
            c.previous(at(2011, 1, 1, 6, 0), false).unwrap().cycle,
            at(2010, 12, 31, 18, 0)
        );
    }

    #[test]
    fn previous_is_none_before_first_year() {
        let c = cron(["0", "0", "*", "*", "2011-2012", "*"]);
        assert_eq!(c.previous(at(2010, 12, 31, 23, 59), false), None);
    }

    // -- membership ---------------------------------------------------------

    #[test]
    fn contains_applies_day_rule() {
        let c = cron(["0", "0,12", "3-31", "2", "*", "6"]);
        assert!(c.contains(at(2009, 2, 28, 12, 0)));
        assert!(c.contains(at(2010, 2, 3, 0, 0)));
        // 2010-02-01 is a Monday and day 1 is outside 3-31.
        assert!(!c.contains(at(2010, 2, 1, 0, 0)));
        assert!(!c.contains(at(2010, 2, 3, 6, 0)));
        assert!(!c.contains(at(2010, 3, 6, 0, 0)));
    }

    #[test]
    fn contains_requires_whole_minute() {
        let c = cron(["*", "*", "*", "*", "*", "*"]);
        assert!(c.contains(at(2011, 1, 1, 0, 0)));
        assert!(!c.contains(Utc.with_ymd_and_hms(2011, 1, 1, 0, 0, 1).unwrap()));
    }

    // -- properties ---------------------------------------------------------

    fn property_cycles() -> Vec<CronCycle> {
        vec![
            cron(["0", "0,12", "3-31", "2", "*", "6"]),
            cron(["0", "0,12", "29-31", "2", "*", "*"]),
            cron(["*/15", "*/6", "*", "*", "*", "*"]),
            cron(["0", "0,12", "*", "*", "*", "6"]),
            cron(["45", "23", "1,15", "*", "2009-2012", "1,5"]),
            cron(["0", "0-18/6", "31", "1-12/2", "*", "*"]),
        ]
    }

    #[test]
    fn next_and_previous_bracket_reftime() {
        for c in property_cycles() {
            for t in sample_times() {
                if let Some(next) = c.next(t, false) {
                    assert!(next.cycle >= t, "{}: next {} < {}", c.expression(), next.cycle, t);
                    assert!(c.contains(next.cycle), "{}: next {} not a member", c.expression(), next.cycle);
                }
                if let Some(prev) = c.previous(t, false) {
                    assert!(prev.cycle <= t, "{}: previous {} > {}", c.expression(), prev.cycle, t);
                    assert!(c.contains(prev.cycle), "{}: previous {} not a member", c.expression(), prev.cycle);
                }
            }
        }
    }

    #[test]
    fn members_are_their_own_next_and_previous() {
        for c in property_cycles() {
            for t in sample_times() {
                let Some(next) = c.next(t, false) else { continue };
                let member = next.cycle;
                assert_eq!(c.next(member, false).unwrap().cycle, member);
                assert_eq!(c.previous(member, false).unwrap().cycle, member);
                assert_eq!(c.next(c.previous(member, false).unwrap().cycle, false).unwrap().cycle, member);
            }
        }
    }

    #[test]
    fn consecutive_occurrences_have_no_gaps() {
        for c in property_cycles() {
            let occurrences: Vec<_> = c.each(at(2009, 1, 1, 0, 0), false).take(40).collect();
            for pair in occurrences.windows(2) {
                let (a, b) = (pair[0].cycle, pair[1].cycle);
                assert!(a < b);
                assert_eq!(c.previous(b - Duration::minutes(1), false).unwrap().cycle, a);
                assert_eq!(c.next(a + Duration::minutes(1), false).unwrap().cycle, b);
            }
        }
    }

    #[test]
    fn next_matches_minute_by_minute_scan() {
        let dense = [
            cron(["*/15", "*/6", "*", "*", "*", "*"]),
            cron(["0", "0,12", "*", "*", "*", "6"]),
            cron(["30", "*", "1", "*", "*", "3"]),
        ];
        for c in &dense {
            for t in sample_times().into_iter().step_by(5) {
                let mut scan = wfm_core::time::ceil_to_minute(t).unwrap();
                while !c.contains(scan) {
                    scan += Duration::minutes(1);
                }
                assert_eq!(c.next(t, false).unwrap().cycle, scan, "{} from {}", c.expression(), t);
            }
        }
    }

    // -- first / last / each / all -------------------------------------------

    #[test]
    fn first_and_last_span_the_year_field() {
        let c = cron(["0", "0,12", "1", "1", "2011-2013", "*"]);
        assert_eq!(c.first().unwrap().cycle, at(2011, 1, 1, 0, 0));
        assert_eq!(c.last().unwrap().cycle, at(2013, 1, 1, 12, 0));
    }

    #[test]
    fn first_of_unbounded_cycle() {
        let c = cron(["0", "0", "*", "*", "*", "*"]);
        assert_eq!(c.first().unwrap().cycle, min_time());
        assert_eq!(c.last().unwrap().cycle, at(9999, 12, 31, 0, 0));
    }

    #[test]
    fn each_is_lazy_and_restartable() {
        let c = cron(["0", "0,12", "*", "*", "*", "*"]);
        let mut iter = c.each(at(2011, 1, 1, 0, 0), false);
        let head: Vec<_> = iter.by_ref().take(3).map(|o| o.cycle).collect();
        assert_eq!(
            head,
            vec![at(2011, 1, 1, 0, 0), at(2011, 1, 1, 12, 0), at(2011, 1, 2, 0, 0)]
        );

        let resumed = iter.clone().next().unwrap().cycle;
        assert_eq!(resumed, at(2011, 1, 2, 12, 0));
        assert_eq!(iter.next().unwrap().cycle, resumed);

        let restarted = c.each(at(2011, 1, 1, 0, 0), false).next().unwrap();
        assert_eq!(restarted.cycle, at(2011, 1, 1, 0, 0));
    }

    #[test]
    fn each_terminates_with_the_year_set() {
        let c = cron(["0", "0", "1", "*", "2011", "*"]);
        assert_eq!(c.each(min_time(), false).count(), 12);
        assert_eq!(c.all().unwrap().len(), 12);
    }

    #[test]
    fn all_rejects_unbounded_year() {
        let c = cron(["0", "0", "1", "*", "*", "*"]);
        assert!(matches!(c.all(), Err(ConfigError::Other(_))));
    }

    // -- activation offset -----------------------------------------------------

    #[test]
    fn activation_time_is_offset_from_occurrence() {
        let c = cron(["0", "0,12", "*", "*", "*", "*"]).with_activation_offset(Duration::hours(1));
        let o = c.next(at(2011, 1, 1, 0, 30), false).unwrap();
        assert_eq!(o.cycle, at(2011, 1, 1, 12, 0));
        assert_eq!(o.activation, at(2011, 1, 1, 13, 0));
    }

    #[test]
    fn next_by_activation_searches_activation_times() {
        let c = cron(["0", "0,12", "*", "*", "*", "*"]).with_activation_offset(Duration::hours(1));
        let o = c.next(at(2011, 1, 1, 0, 30), true).unwrap();
        assert_eq!(o.cycle, at(2011, 1, 1, 0, 0));
        assert_eq!(o.activation, at(2011, 1, 1, 1, 0));

        let p = c.previous(at(2011, 1, 1, 0, 30), true).unwrap();
        assert_eq!(p.cycle, at(2010, 12, 31, 12, 0));
    }

    #[test]
    fn negative_activation_offset() {
        let c = cron(["0", "0", "*", "*", "*", "*"]).with_activation_offset(Duration::hours(-3));
        let o = c.next(at(2011, 1, 1, 20, 0), true).unwrap();
        assert_eq!(o.cycle, at(2011, 1, 2, 0, 0));
        assert_eq!(o.activation, at(2011, 1, 1, 21, 0));

        let late = c.next(at(2011, 1, 1, 22, 0), true).unwrap();
        assert_eq!(late.cycle, at(2011, 1, 3, 0, 0));
    }

    // -- construction ---------------------------------------------------------

    #[test]
    fn parse_expression() {
        let c = CronCycle::parse("synop", " 0  0,12 * * * *").unwrap();
        assert_eq!(c.expression(), "0 0,12 * * * *");
        assert_eq!(c.group(), "synop");
    }

    #[test]
    fn parse_rejects_wrong_field_count() {
        assert!(matches!(
            CronCycle::parse("x", "0 0 * * *"),
            Err(ConfigError::InvalidField { field: "cron", .. })
        ));
    }

    #[test]
    fn construction_names_offending_field() {
        let err = CronCycle::new("x", ["0", "24", "*", "*", "*", "*"]).unwrap_err();
        assert_eq!(err.to_string(), "hour value 24 out of range 0-23");
        let err = CronCycle::new("x", ["0", "0", "*", "jan", "*", "*"]).unwrap_err();
        assert!(err.to_string().contains("month"));
    }
}
