//! Damage application.

use tracing::debug;

use crate::events::EventPayload;
use crate::state::OwnerId;
use crate::stats::tags;
use crate::world::World;

/// Payload of the `injury` event.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InjuryReport {
    pub attacker: Option<OwnerId>,
    pub defender: OwnerId,
    /// Incoming damage before the defender's `injury` modifiers.
    pub raw: f64,
    /// Damage after mitigation.
    pub total: f64,
    /// Hit points actually removed.
    pub taken: i32,
    /// Mitigated damage beyond the remaining hit points.
    pub overkill: f64,
    pub element: String,
    /// The injury dropped the defender from alive to dead.
    pub killed: bool,
}

impl World {
    /// Applies `raw` damage to `defender`.
    ///
    /// The defender's `injury` modifiers are applied here and nowhere else.
    /// Publishes `injury`, then transitions the defender to dead if its hit
    /// points reached zero. Returns `None` for an unknown defender.
    pub fn injure(
        &mut self,
        defender: OwnerId,
        raw: f64,
        attacker: Option<OwnerId>,
        element: Option<&str>,
    ) -> Option<InjuryReport> {
        if !self.owners.contains_key(&defender) {
            return None;
        }
        let total = self.check(defender, raw, tags::INJURY, false);
        let element = element
            .map(str::to_owned)
            .unwrap_or_else(|| self.config.default_element.clone());

        let combatant = self.combatant_mut(defender)?;
        let hp = combatant.hp.max(0);
        let rounded = total.round().clamp(0.0, i32::MAX as f64) as i32;
        let taken = rounded.min(hp);
        combatant.hp -= taken;
        let killed = combatant.hp <= 0 && combatant.is_alive();

        let report = InjuryReport {
            attacker,
            defender,
            raw,
            total,
            taken,
            overkill: (total - taken as f64).max(0.0),
            element,
            killed,
        };
        debug!(
            %defender,
            raw,
            total,
            taken,
            overkill = report.overkill,
            element = %report.element,
            "injury"
        );

        let event_tags = [tags::INJURY.to_owned(), report.element.clone()];
        self.publish(
            "injury",
            attacker,
            EventPayload::Injury(report.clone()),
            event_tags,
        );
        if killed {
            self.die(defender, attacker);
        }
        Some(report)
    }
}
