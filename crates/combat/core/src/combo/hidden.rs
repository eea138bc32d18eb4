use crate::action::HiddenComboDefinition;
use crate::combo::ComboLink;

/// How strictly hidden combos are matched.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TimingPolicy {
    /// Order must match, every gap must fit `max_time_between_inputs`, and
    /// perfect-timing combos need every follow-up link to be a perfect cancel.
    #[default]
    Enforced,
    /// Order alone decides the match.
    OrderOnly,
}

/// Suffix matcher over the combo chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HiddenComboMatcher {
    policy: TimingPolicy,
}

impl HiddenComboMatcher {
    pub const fn new(policy: TimingPolicy) -> Self {
        Self { policy }
    }

    pub const fn policy(&self) -> TimingPolicy {
        self.policy
    }

    /// Returns the first definition, in registry order, whose sequence is the
    /// tail of `chain`.
    pub fn check_match<'a>(
        &self,
        definitions: &'a [HiddenComboDefinition],
        chain: &[ComboLink],
    ) -> Option<&'a HiddenComboDefinition> {
        definitions
            .iter()
            .find(|definition| self.matches(definition, chain))
    }

    pub fn matches(&self, definition: &HiddenComboDefinition, chain: &[ComboLink]) -> bool {
        let len = definition.sequence.len();
        if len == 0 || chain.len() < len {
            return false;
        }

        let tail = &chain[chain.len() - len..];
        let in_order = tail
            .iter()
            .zip(&definition.sequence)
            .all(|(link, &action)| link.action == action);
        if !in_order {
            return false;
        }

        match self.policy {
            TimingPolicy::OrderOnly => true,
            TimingPolicy::Enforced => {
                let gaps_fit = tail.windows(2).all(|pair| {
                    pair[1].at.saturating_sub(pair[0].at) <= definition.max_time_between_inputs
                });
                let timing_ok =
                    !definition.requires_perfect_timing || tail[1..].iter().all(|l| l.perfect);
                gaps_fit && timing_ok
            }
        }
    }
}
