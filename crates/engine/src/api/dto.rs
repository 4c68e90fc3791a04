//! Conversions from domain types to wire DTOs.

use chrono::SecondsFormat;
use wayfarer_domain::{GameEvent, Location, Player};
use wayfarer_shared::{LocationData, PlayerData, ServerEvent};

pub fn location_data(location: &Location) -> LocationData {
    LocationData {
        id: location.id().to_string(),
        name: location.name().to_string(),
        description: location.description().to_string(),
        connections: location
            .connections()
            .iter()
            .map(ToString::to_string)
            .collect(),
    }
}

pub fn player_data(player: &Player) -> PlayerData {
    let attributes = player.attributes();
    PlayerData {
        id: player.id().to_string(),
        name: player.name().to_string(),
        current_location: player.location_id().to_string(),
        health: player.health(),
        strength: attributes.strength,
        dexterity: attributes.dexterity,
    }
}

pub fn server_event(event: &GameEvent) -> ServerEvent {
    ServerEvent {
        event_type: event.event_type().as_str().to_string(),
        player_id: event.player_id().map(ToString::to_string),
        location: event.location_id().map(ToString::to_string),
        target_id: event.target_id().map(ToString::to_string),
        message: event.message().to_string(),
        timestamp: event.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use wayfarer_domain::{LocationId, LocationName, PlayerId, PlayerName};

    #[test]
    fn attack_event_carries_both_players() {
        let here = LocationId::new("cave0001");
        let a = Player::new(PlayerId::new("aaa111"), PlayerName::new("Ann").unwrap(), here.clone());
        let b = Player::new(PlayerId::new("bbb222"), PlayerName::new("Bo").unwrap(), here);
        let now = Utc.with_ymd_and_hms(2026, 5, 4, 3, 2, 1).unwrap();

        let wire = server_event(&GameEvent::player_attacked(&a, &b, 10, now));
        assert_eq!(wire.event_type, "player_attack");
        assert_eq!(wire.player_id.as_deref(), Some("aaa111"));
        assert_eq!(wire.target_id.as_deref(), Some("bbb222"));
        assert_eq!(wire.location.as_deref(), Some("cave0001"));
        assert_eq!(wire.timestamp, "2026-05-04T03:02:01.000Z");
    }

    #[test]
    fn location_lists_connection_ids() {
        let mut cave = Location::new(
            LocationId::new("cave0001"),
            LocationName::new("Crystal Cave").unwrap(),
            "A mysterious Crystal Cave",
        );
        cave.connect(LocationId::new("lake0001"));

        let data = location_data(&cave);
        assert_eq!(data.name, "Crystal Cave");
        assert_eq!(data.connections, vec!["lake0001".to_string()]);
    }
}
