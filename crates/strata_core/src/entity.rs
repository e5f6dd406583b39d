//! Mobile entities: players and creatures.
//!
//! An entity does not know which chunk owns it. Ownership is positional and
//! always recomputed from `position.x`.

use crate::math::Vec3;
use crate::record::{write_line, RecordError, RecordResult, Tokens};

/// Kind of entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityType {
    /// A player character.
    Player = 0,
    /// A chicken.
    Chicken = 1,
}

impl EntityType {
    /// Numeric id written into save files.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Decodes an entity type id.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Player),
            1 => Some(Self::Chicken),
            _ => None,
        }
    }

    /// Health a fresh entity of this kind starts with.
    #[must_use]
    pub const fn max_health(self) -> f32 {
        match self {
            Self::Player => 100.0,
            Self::Chicken => 10.0,
        }
    }
}

/// A simulated body with ballistic motion.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
    health: f32,
    facing_right: bool,
    kind: EntityType,
}

impl Entity {
    /// Number of tokens in one serialized entity record.
    pub const RECORD_LEN: usize = 9;

    /// Creates an entity at rest.
    #[must_use]
    pub const fn new(position: Vec3, health: f32, kind: EntityType) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            health,
            facing_right: true,
            kind,
        }
    }

    /// Creates an entity at rest with the default health of its kind.
    #[must_use]
    pub const fn spawn(position: Vec3, kind: EntityType) -> Self {
        Self::new(position, kind.max_health(), kind)
    }

    /// Advances the entity by `dt_ms` milliseconds.
    ///
    /// Acceleration is a one-shot impulse: it is integrated once and then
    /// cleared. Drag is applied once per call regardless of `dt_ms`.
    pub fn update(&mut self, dt_ms: f32, drag: f32) {
        let dt = dt_ms / 1000.0;
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
        self.velocity *= drag;
        self.acceleration = Vec3::ZERO;

        if self.velocity.x > 0.0 {
            self.facing_right = true;
        } else if self.velocity.x < 0.0 {
            self.facing_right = false;
        }
    }

    /// Adds to this tick's acceleration.
    pub fn accelerate(&mut self, impulse: Vec3) {
        self.acceleration += impulse;
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the entity without integrating.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Current velocity.
    #[inline]
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Replaces the velocity.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Acceleration pending for the next update.
    #[inline]
    #[must_use]
    pub const fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Replaces the pending acceleration.
    pub fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }

    /// Remaining health.
    #[inline]
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Replaces the health.
    pub fn set_health(&mut self, health: f32) {
        self.health = health;
    }

    /// True when the sprite faces right.
    #[inline]
    #[must_use]
    pub const fn is_facing_right(&self) -> bool {
        self.facing_right
    }

    /// Kind of entity.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EntityType {
        self.kind
    }

    /// True for players.
    #[inline]
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.kind == EntityType::Player
    }

    /// Appends this entity as one record line:
    /// `posX posY posZ velX velY velZ health facing typeId`.
    pub fn serialize(&self, out: &mut String) {
        let p = self.position;
        let v = self.velocity;
        write_line(
            out,
            [
                p.x.to_string(),
                p.y.to_string(),
                p.z.to_string(),
                v.x.to_string(),
                v.y.to_string(),
                v.z.to_string(),
                self.health.to_string(),
                u8::from(self.facing_right).to_string(),
                self.kind.id().to_string(),
            ],
        );
    }

    /// Reads one entity record.
    ///
    /// # Errors
    ///
    /// Fails on a truncated record, an unparsable or non-finite token, or an
    /// unknown type id.
    pub fn deserialize(tokens: &mut Tokens<'_>) -> RecordResult<Self> {
        let position = Vec3::new(
            tokens.take_finite("entity position x")?,
            tokens.take_finite("entity position y")?,
            tokens.take_finite("entity position z")?,
        );
        let velocity = Vec3::new(
            tokens.take_finite("entity velocity x")?,
            tokens.take_finite("entity velocity y")?,
            tokens.take_finite("entity velocity z")?,
        );
        let health = tokens.take_finite("entity health")?;
        let facing_right = tokens.take_flag("entity facing")?;
        let type_id: u8 = tokens.take("entity type")?;
        let kind = EntityType::from_id(type_id).ok_or(RecordError::UnknownId {
            kind: "entity type",
            id: u64::from(type_id),
        })?;

        Ok(Self {
            position,
            velocity,
            acceleration: Vec3::ZERO,
            health,
            facing_right,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_integrates_in_seconds() {
        let mut entity = Entity::spawn(Vec3::ZERO, EntityType::Player);
        entity.accelerate(Vec3::new(10.0, 0.0, 0.0));
        entity.update(500.0, 0.9);

        // v = 10 * 0.5 = 5, x = 5 * 0.5 = 2.5, then drag
        assert!((entity.position().x - 2.5).abs() < 1e-5);
        assert!((entity.velocity().x - 4.5).abs() < 1e-5);
        assert_eq!(entity.acceleration(), Vec3::ZERO);
        assert!(entity.is_facing_right());
    }

    #[test]
    fn test_acceleration_is_one_shot() {
        let mut entity = Entity::spawn(Vec3::ZERO, EntityType::Chicken);
        entity.accelerate(Vec3::new(-4.0, 0.0, 0.0));
        entity.update(1000.0, 1.0);
        entity.update(1000.0, 1.0);

        assert!((entity.velocity().x + 4.0).abs() < 1e-5);
        assert!((entity.position().x + 8.0).abs() < 1e-5);
        assert!(!entity.is_facing_right());
    }

    #[test]
    fn test_drag_is_not_time_scaled() {
        let mut a = Entity::spawn(Vec3::ZERO, EntityType::Player);
        let mut b = a.clone();
        a.set_velocity(Vec3::new(1.0, 0.0, 0.0));
        b.set_velocity(Vec3::new(1.0, 0.0, 0.0));
        a.update(1.0, 0.9);
        b.update(100.0, 0.9);
        assert!((a.velocity().x - b.velocity().x).abs() < f32::EPSILON);
    }

    #[test]
    fn test_record_round_trip() {
        let mut entity = Entity::new(Vec3::new(-3.25, 11.0, 0.5), 42.5, EntityType::Chicken);
        entity.set_velocity(Vec3::new(0.1, -2.0, 0.0));
        entity.update(0.0, 1.0);

        let mut text = String::new();
        entity.serialize(&mut text);
        assert_eq!(text.split_whitespace().count(), Entity::RECORD_LEN);

        let restored = Entity::deserialize(&mut Tokens::new(&text)).unwrap();
        assert_eq!(restored, entity);
    }

    #[test]
    fn test_non_finite_position_is_rejected() {
        let mut tokens = Tokens::new("NaN 10 0 0 0 0 10 1 0");
        assert!(matches!(
            Entity::deserialize(&mut tokens),
            Err(RecordError::Invalid {
                field: "entity position x",
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let mut tokens = Tokens::new("0 0 0 0 0 0 10 1 9");
        assert_eq!(
            Entity::deserialize(&mut tokens),
            Err(RecordError::UnknownId {
                kind: "entity type",
                id: 9
            })
        );
    }
}
