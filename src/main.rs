//! Demo: a simulated walk through a three-stop quest
//!
//! Feeds interpolated GPS fixes through the mock source, ticks the
//! controller once per simulated frame and prints the events and the
//! derived presentation state along the way.

use std::error::Error;

use geoquest::{
    load_definitions, ArrowAdapter, GpsSource, GpsSourceConfig, MinimapAdapter, MockGpsSource,
    QuestController, QuestEvent, QuestStatus, UserPositionTracker,
};

const QUEST_JSON: &str = r#"[
    {
        "active": true,
        "latitude": "47.49790",
        "longitude": "19.04020",
        "label": "START",
        "activationRadiusMeters": 15.0
    },
    {
        "latitude": "47.49850",
        "longitude": "19.04100",
        "label": "Old Fountain",
        "activationRadiusMeters": 12.0,
        "appearanceToken": "fountain_marker"
    },
    {
        "latitude": "47.49910",
        "longitude": "19.04180",
        "label": "FINISH",
        "activationRadiusMeters": 15.0
    }
]"#;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut controller = QuestController::new();
    let mut tracker = UserPositionTracker::new();
    tracker.set_heading(Some(40.0));

    let arrow = ArrowAdapter::attach(&mut controller);
    let minimap = MinimapAdapter::attach(&mut controller);
    controller.subscribe(Box::new(|event| match event {
        QuestEvent::NavigationStarted { waypoint } => {
            println!("-> navigation started: {:?}", waypoint)
        }
        QuestEvent::ArrivedAtPlace { waypoint } => println!("-> arrived at {:?}", waypoint),
        QuestEvent::PlacesUpdated => println!("-> places updated"),
        QuestEvent::AllPlacesVisited => println!("-> quest complete!"),
    }));

    for definition in load_definitions(QUEST_JSON)? {
        let id = controller.register(&definition)?;
        println!("registered '{}' as {:?}", definition.label, id);
    }

    // Straight-line walk from just south of START to past FINISH
    let mut gps = MockGpsSource::new(GpsSourceConfig {
        update_interval_ms: 1000,
        ..Default::default()
    });
    let (from_lat, from_lon) = (47.49770, 19.03990);
    let (to_lat, to_lon) = (47.49915, 19.04185);
    let steps: u32 = 60;
    for step in 0..=steps {
        let t = f64::from(step) / f64::from(steps);
        gps.push_fix(
            from_lat + (to_lat - from_lat) * t,
            from_lon + (to_lon - from_lon) * t,
            u64::from(step) * 1000,
        );
    }

    while controller.status() != QuestStatus::Succeeded {
        let Some(reading) = gps.poll() else {
            println!("GPS feed exhausted before the quest finished");
            break;
        };
        tracker.on_geo_update(reading);
        controller.tick(&tracker);

        if let Some(rotation) = arrow.borrow().rotation_degrees(&tracker, &controller) {
            let pins = minimap.borrow().pins(&controller);
            let visited = pins
                .iter()
                .filter(|(_, s)| *s == geoquest::PinState::Visited)
                .count();
            println!(
                "t={:>5} ms  arrow {:>7.1} deg  visited {}/{}",
                reading.timestamp_ms,
                rotation,
                visited,
                pins.len()
            );
        }
    }

    println!("final status: {:?}", controller.status());
    Ok(())
}
