//! Keeps the two most recently mentioned cities and their teams.

use recency_cache::LruCache;

fn main() {
    let mut teams = LruCache::new(2);

    for (city, team) in [
        ("New York", "Mets"),
        ("Philadelphia", "Phillies"),
        ("Boston", "Red Sox"),
        ("Oakland", "A's"),
        ("Pittsburgh", "Pirates"),
    ] {
        if let Some((gone, _)) = teams.insert(city, team) {
            println!("inserted {city}, evicted {gone}");
        } else {
            println!("inserted {city}");
        }
    }

    match teams.get("Pittsburgh") {
        Ok(team) => println!("Pittsburgh plays as the {team}"),
        Err(err) => println!("Pittsburgh: {err}"),
    }
    match teams.get("New York") {
        Ok(team) => println!("New York plays as the {team}"),
        Err(err) => println!("New York: {err}"),
    }

    println!("\nmost recent first:\n{}", teams.dump());
}
