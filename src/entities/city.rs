static CITIES: [&str; 30] = [
    "Mumbai",
    "Delhi",
    "Bangalore",
    "Hyderabad",
    "Chennai",
    "Kolkata",
    "Pune",
    "Ahmedabad",
    "Jaipur",
    "Surat",
    "Lucknow",
    "Kanpur",
    "Nagpur",
    "Indore",
    "Thane",
    "Bhopal",
    "Visakhapatnam",
    "Patna",
    "Vadodara",
    "Ghaziabad",
    "Ludhiana",
    "Agra",
    "Nashik",
    "Faridabad",
    "Meerut",
    "Rajkot",
    "Varanasi",
    "Srinagar",
    "Aurangabad",
    "Dhanbad",
];

/// Cities served for pickup and drop, alphabetically.
pub fn sorted() -> Vec<&'static str> {
    let mut cities = CITIES.to_vec();
    cities.sort_unstable();
    cities
}

#[test]
fn sorted_cities_test() {
    let cities = sorted();

    assert_eq!(cities.len(), 30);
    assert_eq!(cities.first(), Some(&"Agra"));
    assert_eq!(cities.last(), Some(&"Visakhapatnam"));
    assert!(cities.windows(2).all(|w| w[0] < w[1]));
}
