//! Canned OSRM and Nominatim response bodies for mocked backends.

/// OSRM route payload with a GeoJSON line, points given as (lon, lat).
pub fn osrm_route_body(distance_m: f64, duration_s: f64, line: &[(f64, f64)]) -> String {
    let coordinates: Vec<[f64; 2]> = line.iter().map(|&(lon, lat)| [lon, lat]).collect();
    serde_json::json!({
        "code": "Ok",
        "routes": [{
            "distance": distance_m,
            "duration": duration_s,
            "geometry": {"type": "LineString", "coordinates": coordinates}
        }],
        "waypoints": []
    })
    .to_string()
}

pub fn osrm_code_body(code: &str) -> String {
    serde_json::json!({"code": code, "message": "mocked"}).to_string()
}

pub fn nominatim_body(lat: f64, lon: f64) -> String {
    serde_json::json!([{
        "place_id": 1,
        "lat": lat.to_string(),
        "lon": lon.to_string(),
        "display_name": "mocked"
    }])
    .to_string()
}
