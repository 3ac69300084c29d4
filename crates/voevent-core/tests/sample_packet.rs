use voevent_core::{Citation, Voevent};

const SAMPLE: &[u8] = include_bytes!("../../voevent-xml/tests/data/voevent.xml");

fn sample() -> Voevent {
    Voevent::from_bytes(SAMPLE).expect("load sample packet")
}

#[test]
fn header_fields() {
    let event = sample();
    assert_eq!(
        event.ivorn().unwrap(),
        "ivo://voevent.example.org/TEST/ASSASN-14-bj#2014-07-04T12:05:00"
    );
    assert_eq!(event.role().unwrap(), "test");
    assert_eq!(event.version().unwrap(), "2.0");
    assert_eq!(event.who_date(), Some("2014-07-04T12:05:00"));
    assert_eq!(event.author_ivorn(), Some("ivo://voevent.example.org/TEST"));
    assert_eq!(event.inference_names(), ["GRB121212A"]);
    assert_eq!(
        event.citations(),
        [Citation {
            ivorn: "ivo://voevent.example.org/TEST/ASSASN-14-bj#2014-07-03T10:00:00",
            cite: Some("followup"),
        }]
    );
}

#[test]
fn where_when() {
    let event = sample();
    assert_eq!(event.isotime(), Some("2014-07-04T11:58:41"));
    let pos = event.position().unwrap().expect("sample has a position");
    assert_eq!(pos.ra, 123.5);
    assert_eq!(pos.dec, 45.0);
    assert_eq!(pos.err, Some(0.1));
    assert_eq!(pos.unit.as_deref(), Some("deg"));
    assert_eq!(pos.system.as_deref(), Some("UTC-FK5-GEO"));
}

#[test]
fn flattened_what() {
    let event = sample();
    let what = event.flatten_what();
    assert_eq!(what.param_count(), 3);

    let flux = what.group("source_flux").expect("source_flux group");
    let names: Vec<&str> = flux.keys().map(String::as_str).collect();
    assert_eq!(names, ["int_flux", "peak_flux"]);
    let peak = &flux["peak_flux"];
    assert_eq!(peak.value.as_deref(), Some("12.3"));
    assert_eq!(peak.unit.as_deref(), Some("mJy"));
    assert_eq!(peak.description.as_deref(), Some("Peak Flux"));
    assert_eq!(peak.ucd.as_deref(), Some("em.radio.100-200MHz"));
    assert_eq!(flux["int_flux"].value.as_deref(), Some("45.6"));

    let alert = &what.toplevel["alert_type"];
    assert_eq!(alert.value.as_deref(), Some("test"));
    assert_eq!(alert.data_type.as_deref(), Some("string"));

    assert_eq!(what, event.flatten_what());
}

#[test]
fn flattened_what_as_json() {
    let what = sample().flatten_what();
    let json = serde_json::to_value(&what).unwrap();
    assert_eq!(json["groups"]["source_flux"]["peak_flux"]["value"], "12.3");
    assert_eq!(json["groups"]["source_flux"]["int_flux"]["unit"], "mJy");
    assert_eq!(json["toplevel"]["alert_type"]["description"], "Packet classification");
}

#[test]
fn packet_round_trips() {
    let event = sample();
    let reloaded = Voevent::from_bytes(&event.to_xml().unwrap()).unwrap();
    assert_eq!(reloaded, event);
}
