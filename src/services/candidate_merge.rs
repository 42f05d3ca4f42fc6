/// Fusion of candidate shot moments from the wrist and trajectory signals
use serde::{Deserialize, Serialize};

use crate::models::CandidateEvent;

/// How the two candidate streams are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Wrist candidates only; trajectory stays advisory
    #[default]
    Wrist,
    /// Both streams; a trajectory candidate only counts when it is clear of
    /// every wrist candidate by more than the refractory gap
    Union,
}

impl std::str::FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wrist" => Ok(MergePolicy::Wrist),
            "union" => Ok(MergePolicy::Union),
            other => Err(format!("unknown merge policy: {}", other)),
        }
    }
}

/// Merge candidate streams into one ordered list whose consecutive frames
/// are more than `min_gap_frames` apart.
///
/// Wrist candidates are placed first; trajectory candidates fill in moments
/// the wrist signal missed and never displace a wrist candidate.
pub fn merge_candidates(
    wrist: &[CandidateEvent],
    trajectory: &[CandidateEvent],
    policy: MergePolicy,
    min_gap_frames: usize,
) -> Vec<CandidateEvent> {
    let mut merged: Vec<CandidateEvent> = Vec::with_capacity(wrist.len() + trajectory.len());
    accept_clear(&mut merged, wrist, min_gap_frames);

    if policy == MergePolicy::Union {
        accept_clear(&mut merged, trajectory, min_gap_frames);
    }

    merged.sort_by_key(|c| c.frame_index);
    merged
}

/// Add candidates, in frame order, that are more than `min_gap_frames` from
/// everything already accepted
fn accept_clear(
    accepted: &mut Vec<CandidateEvent>,
    candidates: &[CandidateEvent],
    min_gap_frames: usize,
) {
    let mut ordered = candidates.to_vec();
    ordered.sort_by_key(|c| c.frame_index);

    for candidate in ordered {
        let clear = accepted
            .iter()
            .all(|a| a.frame_index.abs_diff(candidate.frame_index) > min_gap_frames);
        if clear {
            accepted.push(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wrist_policy_ignores_trajectory() {
        let wrist = vec![CandidateEvent::wrist(10, 30.0), CandidateEvent::wrist(40, 25.0)];
        let trajectory = vec![CandidateEvent::trajectory(25)];

        let merged = merge_candidates(&wrist, &trajectory, MergePolicy::Wrist, 5);
        assert_eq!(merged, wrist);
    }

    #[test]
    fn test_union_keeps_distinct_moments() {
        let wrist = vec![CandidateEvent::wrist(10, 30.0)];
        let trajectory = vec![CandidateEvent::trajectory(25)];

        let merged = merge_candidates(&wrist, &trajectory, MergePolicy::Union, 5);
        let frames: Vec<usize> = merged.iter().map(|c| c.frame_index).collect();
        assert_eq!(frames, vec![10, 25]);
    }

    #[test]
    fn test_union_prefers_wrist_on_ties_and_dedups() {
        let wrist = vec![CandidateEvent::wrist(12, 30.0)];
        let trajectory = vec![
            CandidateEvent::trajectory(12),
            CandidateEvent::trajectory(15),
            CandidateEvent::trajectory(30),
        ];

        let merged = merge_candidates(&wrist, &trajectory, MergePolicy::Union, 5);
        assert_eq!(
            merged,
            vec![CandidateEvent::wrist(12, 30.0), CandidateEvent::trajectory(30)]
        );
    }

    #[test]
    fn test_union_keeps_wrist_over_earlier_trajectory() {
        let wrist = vec![CandidateEvent::wrist(10, 30.0), CandidateEvent::wrist(40, 25.0)];
        let trajectory = vec![
            CandidateEvent::trajectory(6),
            CandidateEvent::trajectory(8),
            CandidateEvent::trajectory(36),
        ];

        let merged = merge_candidates(&wrist, &trajectory, MergePolicy::Union, 5);
        assert_eq!(merged, wrist);
    }

    #[test]
    fn test_union_trajectory_before_wrist_when_clear() {
        let wrist = vec![CandidateEvent::wrist(20, 30.0)];
        let trajectory = vec![CandidateEvent::trajectory(14), CandidateEvent::trajectory(16)];

        let merged = merge_candidates(&wrist, &trajectory, MergePolicy::Union, 5);
        assert_eq!(
            merged,
            vec![CandidateEvent::trajectory(14), CandidateEvent::wrist(20, 30.0)]
        );
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("union".parse::<MergePolicy>(), Ok(MergePolicy::Union));
        assert_eq!("Wrist".parse::<MergePolicy>(), Ok(MergePolicy::Wrist));
        assert!("both".parse::<MergePolicy>().is_err());
    }
}
