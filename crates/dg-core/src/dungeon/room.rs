//! Rooms and stair flags

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Point;

bitflags! {
    /// Stair flags
    ///
    /// UP and DOWN are independent: tower floors carry both.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Stairs: u8 {
        const UP = 0x01;
        const DOWN = 0x02;
    }
}

impl Stairs {
    pub const NONE: Stairs = Stairs::empty();
}

// Manual serde impl for Stairs
impl Serialize for Stairs {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Stairs {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Stairs::from_bits_truncate(bits))
    }
}

/// A generated room
///
/// Rooms are created once by a room factory and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    /// Top-left corner
    pub location: Point,
    pub width: i32,
    pub height: i32,
    pub monsters: bool,
    pub treasure: bool,
    pub trap: bool,
    pub shop: bool,
    pub stairs: Stairs,
}

impl Room {
    /// Class markers, in fixed order
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::with_capacity(6);
        if self.monsters {
            tags.push("monsters");
        }
        if self.treasure {
            tags.push("treasure");
        }
        if self.trap {
            tags.push("trap");
        }
        if self.shop {
            tags.push("shop");
        }
        if self.stairs.contains(Stairs::UP) {
            tags.push("up");
        }
        if self.stairs.contains(Stairs::DOWN) {
            tags.push("down");
        }
        tags
    }

    pub fn center(&self) -> Point {
        self.location
            .offset(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Identifier used for this room's primitive in a floor document
    pub fn element_id(&self) -> String {
        format!("room-{}", self.id)
    }

    /// A starter note describing the room, numbered from 1
    pub fn note(&self, index: usize) -> String {
        let mut note = format!("Room {}:\n", index + 1);
        if self.stairs.contains(Stairs::UP) {
            note.push_str("There are stairs up here.\n");
        }
        if self.stairs.contains(Stairs::DOWN) {
            note.push_str("There are stairs down here.\n");
        }
        if self.shop {
            note.push_str("This room is a shop.\n");
        }
        if self.monsters {
            note.push_str("This room contains monsters.\n");
        }
        if self.treasure {
            note.push_str("This room contains treasure.\n");
        }
        if self.trap {
            note.push_str("There is a trap here.\n");
        }
        note
    }

    /// Status letters used by level summaries
    pub(crate) fn status(&self) -> String {
        let mut status = [' '; 5];
        if self.shop {
            status[0] = 'S';
        }
        if self.monsters {
            status[1] = 'M';
        }
        if self.treasure {
            status[2] = '$';
        }
        if self.trap {
            status[3] = 'T';
        }
        status[4] = match (
            self.stairs.contains(Stairs::UP),
            self.stairs.contains(Stairs::DOWN),
        ) {
            (true, true) => 'B',
            (true, false) => 'U',
            (false, true) => 'D',
            (false, false) => ' ',
        };
        status.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(stairs: Stairs) -> Room {
        Room {
            id: Uuid::nil(),
            location: Point::new(4.0, 6.0),
            width: 10,
            height: 6,
            monsters: false,
            treasure: false,
            trap: false,
            shop: false,
            stairs,
        }
    }

    #[test]
    fn test_tags_order() {
        let mut r = room(Stairs::UP | Stairs::DOWN);
        r.monsters = true;
        r.treasure = true;
        r.trap = true;
        r.shop = true;
        assert_eq!(
            r.tags(),
            vec!["monsters", "treasure", "trap", "shop", "up", "down"]
        );
    }

    #[test]
    fn test_tags_empty() {
        assert!(room(Stairs::NONE).tags().is_empty());
        assert_eq!(room(Stairs::DOWN).tags(), vec!["down"]);
    }

    #[test]
    fn test_center() {
        assert_eq!(room(Stairs::NONE).center(), Point::new(9.0, 9.0));
    }

    #[test]
    fn test_note_lists_features() {
        let mut r = room(Stairs::UP);
        r.treasure = true;
        assert_eq!(
            r.note(2),
            "Room 3:\nThere are stairs up here.\nThis room contains treasure.\n"
        );
    }

    #[test]
    fn test_stairs_serde_as_bits() {
        let json = serde_json::to_string(&(Stairs::UP | Stairs::DOWN)).unwrap();
        assert_eq!(json, "3");
        let back: Stairs = serde_json::from_str("2").unwrap();
        assert_eq!(back, Stairs::DOWN);
    }

    #[test]
    fn test_element_id() {
        assert_eq!(
            room(Stairs::NONE).element_id(),
            "room-00000000-0000-0000-0000-000000000000"
        );
    }
}
