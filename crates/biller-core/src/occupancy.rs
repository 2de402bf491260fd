//! Occupancy reconstruction.
//!
//! Replays the activity log into a [`Timeline`] of snapshots, each recording
//! who is present from its date until the next snapshot's date.
//!
//! # State machine
//!
//! Every member starts absent.
//!
//! | action | from    | to      | otherwise                  |
//! |--------|---------|---------|----------------------------|
//! | `+1`   | absent  | present | already there              |
//! | `-1`   | present | absent  | not previously there       |
//! | `0`    | present | present | not previously there       |
//!
//! A `0` marks the member away for that single date. The following date gets
//! a recovery snapshot restoring them, whether or not the log mentions it,
//! unless a later `+1` or `-1` on the same date cancels the pending recovery.
//! Actions within a date apply in the order they are listed.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::day::Day;
use crate::document::{ActionCode, Activities};
use crate::error::{BuildError, ConfigError};
use crate::roster::Roster;

/// A single logged action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveIn,
    MoveOut,
    /// Away for this one date only.
    Skip,
}

impl TryFrom<&ActionCode> for Action {
    type Error = ActionCode;

    fn try_from(code: &ActionCode) -> Result<Self, Self::Error> {
        match code {
            ActionCode::Int(1) => Ok(Self::MoveIn),
            ActionCode::Int(-1) => Ok(Self::MoveOut),
            ActionCode::Int(0) => Ok(Self::Skip),
            other => Err(other.clone()),
        }
    }
}

/// Activity log in chronological order, one entry per date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    days: Vec<(Day, Vec<(String, ActionCode)>)>,
}

impl EventLog {
    /// Sorts the document's activities by date; each date may appear once.
    pub fn new(activities: Activities) -> Result<Self, ConfigError> {
        let mut days: Vec<_> = activities
            .0
            .into_iter()
            .map(|(date, actions)| (date, actions.0))
            .collect();
        days.sort_by_key(|(date, _)| *date);

        if let Some(pair) = days.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(ConfigError::DuplicateDate { date: pair[0].0 });
        }
        Ok(Self { days })
    }

    pub fn days(&self) -> &[(Day, Vec<(String, ActionCode)>)] {
        &self.days
    }
}

/// Who is present from `date` until the next snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub date: Day,
    pub members: BTreeSet<String>,
    /// Present members per family, roster order, zero counts omitted.
    pub family_headcount: Vec<(String, usize)>,
}

impl Snapshot {
    /// Nobody present.
    pub fn vacant(date: Day) -> Self {
        Self {
            date,
            members: BTreeSet::new(),
            family_headcount: Vec::new(),
        }
    }

    fn new(date: Day, members: BTreeSet<String>, roster: &Roster) -> Self {
        let family_headcount = roster
            .families()
            .iter()
            .filter_map(|family| {
                let count = family
                    .members
                    .iter()
                    .filter(|m| members.contains(*m))
                    .count();
                (count > 0).then(|| (family.name.clone(), count))
            })
            .collect();
        Self {
            date,
            members,
            family_headcount,
        }
    }

    pub fn headcount(&self) -> usize {
        self.members.len()
    }

    /// Number of families with at least one member present.
    pub fn occupied_families(&self) -> usize {
        self.family_headcount.len()
    }

    pub fn headcount_of(&self, family: &str) -> usize {
        self.family_headcount
            .iter()
            .find(|(name, _)| name == family)
            .map_or(0, |(_, count)| *count)
    }
}

/// Immutable, coalesced sequence of snapshots in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    snapshots: Vec<Snapshot>,
}

impl Timeline {
    /// Replays the log against the roster.
    pub fn reconstruct(roster: &Roster, log: &EventLog) -> Result<Self, BuildError> {
        let mut timeline = Self::default();
        let mut occupying: BTreeSet<String> = BTreeSet::new();
        let mut recovery: Option<Day> = None;

        for (date, actions) in log.days() {
            let date = *date;
            if let Some(next) = recovery.take() {
                if next != date {
                    timeline.record(next, occupying.clone(), roster);
                }
            }

            let mut today = occupying.clone();
            for (member, code) in actions {
                if !roster.contains(member) {
                    return Err(ConfigError::UnknownMember {
                        date,
                        member: member.clone(),
                    }
                    .into());
                }
                let action = Action::try_from(code).map_err(|action| BuildError::InvalidAction {
                    date,
                    member: member.clone(),
                    action,
                })?;

                match action {
                    Action::MoveIn => {
                        if !occupying.insert(member.clone()) {
                            return Err(BuildError::AlreadyPresent {
                                date,
                                member: member.clone(),
                            });
                        }
                        today.insert(member.clone());
                        recovery = None;
                    }
                    Action::MoveOut | Action::Skip => {
                        if !occupying.contains(member) {
                            return Err(BuildError::NotPresent {
                                date,
                                member: member.clone(),
                            });
                        }
                        today.remove(member);
                        if action == Action::MoveOut {
                            occupying.remove(member);
                            recovery = None;
                        } else {
                            recovery = Some(date.succ());
                        }
                    }
                }
            }
            timeline.record(date, today, roster);
        }

        if let Some(next) = recovery {
            timeline.record(next, occupying, roster);
        }

        debug!(snapshots = timeline.snapshots.len(), "occupancy reconstructed");
        Ok(timeline)
    }

    /// Appends a snapshot unless occupancy is unchanged.
    fn record(&mut self, date: Day, members: BTreeSet<String>, roster: &Roster) {
        let unchanged = self
            .snapshots
            .last()
            .map_or(members.is_empty(), |prev| prev.members == members);
        if unchanged {
            debug!(%date, "occupancy unchanged, coalesced");
            return;
        }
        debug!(%date, present = members.len(), "occupancy snapshot");
        self.snapshots.push(Snapshot::new(date, members, roster));
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Index of the latest snapshot dated on or before `day`.
    pub fn latest_at(&self, day: Day) -> Option<usize> {
        self.snapshots
            .partition_point(|s| s.date <= day)
            .checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Ordered;
    use crate::roster::Family;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    fn roster() -> Roster {
        let family = |name: &str, members: &[&str]| Family {
            name: name.to_string(),
            members: members.iter().map(ToString::to_string).collect(),
            template: None,
        };
        Roster::new(vec![
            family("W&E", &["Willow", "Emersyn"]),
            family("M&M", &["Mckenna", "Mia"]),
            family("S", &["Steven"]),
        ])
        .unwrap()
    }

    fn log(entries: &[(&str, &[(&str, i64)])]) -> EventLog {
        let activities = entries
            .iter()
            .map(|(date, actions)| {
                let actions = actions
                    .iter()
                    .map(|(member, code)| ((*member).to_string(), ActionCode::from(*code)))
                    .collect::<Ordered<_, _>>();
                (day(date), actions)
            })
            .collect();
        EventLog::new(activities).unwrap()
    }

    fn reference_log() -> EventLog {
        log(&[
            ("20220101", &[("Willow", 1), ("Emersyn", 1)]),
            ("20220105", &[("Mia", 1), ("Steven", 1)]),
            ("20220110", &[("Willow", -1)]),
            ("20220115", &[("Mia", 0)]),
            ("20220116", &[("Mia", 0)]),
        ])
    }

    fn summary(timeline: &Timeline) -> Vec<(String, Vec<&str>)> {
        timeline
            .snapshots()
            .iter()
            .map(|s| (s.date.to_string(), s.members.iter().map(String::as_str).collect()))
            .collect()
    }

    #[test]
    fn reference_log_reconstructs_expected_timeline() {
        let timeline = Timeline::reconstruct(&roster(), &reference_log()).unwrap();
        assert_eq!(
            summary(&timeline),
            vec![
                ("20220101".to_string(), vec!["Emersyn", "Willow"]),
                ("20220105".to_string(), vec!["Emersyn", "Mia", "Steven", "Willow"]),
                ("20220110".to_string(), vec!["Emersyn", "Mia", "Steven"]),
                ("20220115".to_string(), vec!["Emersyn", "Steven"]),
                ("20220117".to_string(), vec!["Emersyn", "Mia", "Steven"]),
            ]
        );
    }

    #[test]
    fn consecutive_snapshots_always_differ() {
        let timeline = Timeline::reconstruct(&roster(), &reference_log()).unwrap();
        for pair in timeline.snapshots().windows(2) {
            assert_ne!(pair[0].members, pair[1].members);
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn family_headcount_follows_roster_and_omits_empty_families() {
        let timeline = Timeline::reconstruct(&roster(), &reference_log()).unwrap();
        let second = &timeline.snapshots()[1];
        assert_eq!(
            second.family_headcount,
            vec![
                ("W&E".to_string(), 2),
                ("M&M".to_string(), 1),
                ("S".to_string(), 1)
            ]
        );
        assert_eq!(second.occupied_families(), 3);
        assert_eq!(timeline.snapshots()[0].headcount_of("S"), 0);
        assert_eq!(timeline.snapshots()[0].occupied_families(), 1);
    }

    #[test]
    fn skip_without_next_day_event_synthesizes_recovery() {
        let timeline = Timeline::reconstruct(
            &roster(),
            &log(&[
                ("20220101", &[("Steven", 1), ("Mia", 1)]),
                ("20220110", &[("Mia", 0)]),
                ("20220120", &[("Steven", -1)]),
            ]),
        )
        .unwrap();
        assert_eq!(
            summary(&timeline),
            vec![
                ("20220101".to_string(), vec!["Mia", "Steven"]),
                ("20220110".to_string(), vec!["Steven"]),
                ("20220111".to_string(), vec!["Mia", "Steven"]),
                ("20220120".to_string(), vec!["Mia"]),
            ]
        );
    }

    #[test]
    fn move_after_skip_on_same_date_cancels_recovery() {
        let timeline = Timeline::reconstruct(
            &roster(),
            &log(&[
                ("20220101", &[("Mia", 1)]),
                ("20220105", &[("Mia", 0), ("Steven", 1)]),
                ("20220110", &[("Steven", -1)]),
            ]),
        )
        .unwrap();
        assert_eq!(
            summary(&timeline),
            vec![
                ("20220101".to_string(), vec!["Mia"]),
                ("20220105".to_string(), vec!["Steven"]),
                ("20220110".to_string(), vec!["Mia"]),
            ]
        );
    }

    #[test]
    fn skip_after_move_on_same_date_still_recovers() {
        let timeline = Timeline::reconstruct(
            &roster(),
            &log(&[
                ("20220101", &[("Mia", 1)]),
                ("20220105", &[("Steven", 1), ("Mia", 0)]),
            ]),
        )
        .unwrap();
        assert_eq!(
            summary(&timeline),
            vec![
                ("20220101".to_string(), vec!["Mia"]),
                ("20220105".to_string(), vec!["Steven"]),
                ("20220106".to_string(), vec!["Mia", "Steven"]),
            ]
        );
    }

    #[test]
    fn empty_log_gives_empty_timeline() {
        let timeline = Timeline::reconstruct(&roster(), &EventLog::default()).unwrap();
        assert!(timeline.snapshots().is_empty());
        assert_eq!(timeline.latest_at(day("20220101")), None);
    }

    #[test]
    fn latest_at_finds_snapshot_on_or_before() {
        let timeline = Timeline::reconstruct(&roster(), &reference_log()).unwrap();
        assert_eq!(timeline.latest_at(day("20211231")), None);
        assert_eq!(timeline.latest_at(day("20220101")), Some(0));
        assert_eq!(timeline.latest_at(day("20220104")), Some(0));
        assert_eq!(timeline.latest_at(day("20220105")), Some(1));
        assert_eq!(timeline.latest_at(day("20230101")), Some(4));
    }

    #[test]
    fn activities_are_sorted_chronologically() {
        let sorted = log(&[
            ("20220105", &[("Willow", -1)]),
            ("20220101", &[("Willow", 1)]),
        ]);
        let dates: Vec<_> = sorted.days().iter().map(|(d, _)| d.to_string()).collect();
        assert_eq!(dates, ["20220101", "20220105"]);
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let activities = [
            (day("20220101"), Ordered(vec![("Mia".to_string(), ActionCode::Int(1))])),
            (day("20220101"), Ordered(vec![("Steven".to_string(), ActionCode::Int(1))])),
        ]
        .into_iter()
        .collect();
        let err = EventLog::new(activities).unwrap_err();
        assert_eq!(err.to_string(), "activities[20220101] is listed more than once");
    }

    #[test]
    fn invalid_transitions_name_date_and_member() {
        let cases: [(&[(&str, &[(&str, i64)])], &str); 5] = [
            (
                &[("20220101", &[("Mia", 1)]), ("20220102", &[("Mia", 1)])],
                "activities[20220102].Mia was already there",
            ),
            (
                &[("20220101", &[("Mia", -1)])],
                "activities[20220101].Mia was not previously there",
            ),
            (
                &[("20220101", &[("Mia", 0)])],
                "activities[20220101].Mia was not previously there",
            ),
            (
                &[("20220101", &[("Mia", 2)])],
                "activities[20220101].Mia has invalid action: 2",
            ),
            (
                &[("20220101", &[("Zoe", 1)])],
                "activities[20220101].Zoe does not belong to any family",
            ),
        ];

        for (entries, message) in cases {
            let err = Timeline::reconstruct(&roster(), &log(entries)).unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }
}
