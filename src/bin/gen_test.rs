//! Synthetic SMS history generator for stress testing threadline.
//!
//! Usage: cargo run --features gen-test --bin gen_test -- [messages] [output] [contacts]
//! Example: cargo run --features gen-test --bin gen_test -- 100000 sms.jsonl 200
//!
//! Messages arrive in bursts (seconds to minutes apart) separated by long
//! silences, so thread segmentation has real work to do. Some contacts are
//! written under two identities (missing country code, nickname) to give
//! duplicate detection something to find.

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};

use chrono::{Duration, TimeZone, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use threadline::{ContactIdentity, Message};

const OWN_PHONE: &str = "+15550000000";

const FIRST_NAMES: &[&str] = &[
    "Michael", "Robert", "William", "Elizabeth", "Katherine", "Jennifer", "Alexander", "Daniel",
    "Christopher", "Margaret", "Anthony", "Jessica", "Дмитрий", "Айгерим", "村上", "محمد",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Brown", "Garcia", "Miller", "Davis", "Lopez", "Wilson", "Иванова", "",
];

const NICKNAMES: &[(&str, &str)] = &[
    ("Michael", "Mike"),
    ("Robert", "Bob"),
    ("William", "Bill"),
    ("Elizabeth", "Liz"),
    ("Katherine", "Kate"),
    ("Jennifer", "Jen"),
    ("Alexander", "Alex"),
    ("Daniel", "Dan"),
    ("Christopher", "Chris"),
    ("Margaret", "Maggie"),
    ("Anthony", "Tony"),
    ("Jessica", "Jess"),
];

const BODIES: &[&str] = &[
    "hey",
    "are you around?",
    "running 10 min late",
    "ok 👍",
    "call me when you can",
    "lol",
    "see you at 7; bring the \"thing\"",
    "Привет!",
    "",
    "what time works for you tomorrow?\nI'm free after 3",
];

/// One simulated person and the identities their messages show up under.
struct Person {
    identities: Vec<ContactIdentity>,
}

fn make_people(count: usize, rng: &mut impl Rng) -> Vec<Person> {
    (0..count)
        .map(|i| {
            let first = FIRST_NAMES[i % FIRST_NAMES.len()];
            let last = LAST_NAMES.choose(rng).copied().unwrap_or("");
            let name = format!("{} {}", first, last).trim().to_string();
            let local = format!("555{:07}", 1_000_000 + i);
            let canonical = ContactIdentity::new(name, format!("+1{}", local));

            let mut identities = vec![canonical];
            match rng.gen_range(0..10) {
                // Same person, stored without the country code
                0 | 1 => {
                    let name = identities[0].name.clone();
                    identities.push(ContactIdentity::new(name, local));
                }
                // Same person under a nickname on a second line
                2 => {
                    if let Some((_, nick)) = NICKNAMES.iter().find(|(full, _)| *full == first) {
                        let phone = format!("+1666{:07}", 1_000_000 + i);
                        identities.push(ContactIdentity::new(*nick, phone));
                    }
                }
                _ => {}
            }

            Person { identities }
        })
        .collect()
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let output = args.get(2).map(|s| s.as_str()).unwrap_or("synthetic_sms.jsonl");
    let contacts: usize = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(200)
        .max(1);

    println!("🧪 Synthetic SMS Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Messages: {}", count);
    println!("   Contacts: {}", contacts);
    println!("   Output:   {}", output);
    println!("   Me:       {}", OWN_PHONE);
    println!();

    let file = File::create(output).expect("Failed to create output file");
    let mut writer = BufWriter::with_capacity(1024 * 1024, file); // 1MB buffer

    let mut rng = rand::thread_rng();
    let people = make_people(contacts, &mut rng);
    let me = ContactIdentity::new("Me", OWN_PHONE);

    let start = std::time::Instant::now();
    let mut clock = Utc.with_ymd_and_hms(2023, 1, 1, 8, 0, 0).unwrap();
    let mut written = 0usize;
    let mut bytes_written = 0usize;

    while written < count {
        // One burst with one person
        let person = people.choose(&mut rng).expect("at least one contact");
        let identity = person
            .identities
            .choose(&mut rng)
            .expect("every person has an identity");
        let burst = rng.gen_range(1..=12).min(count - written);

        for _ in 0..burst {
            let body = *BODIES.choose(&mut rng).unwrap_or(&"");
            let msg = if rng.gen_bool(0.5) {
                Message::sent(clock, me.clone(), identity.clone(), body)
            } else {
                Message::received(clock, identity.clone(), me.clone(), body)
            };

            let line = serde_json::to_string(&msg).expect("message serializes");
            bytes_written += line.len() + 1;
            writeln!(writer, "{}", line).unwrap();
            written += 1;

            clock += Duration::seconds(rng.gen_range(5..900));

            if written % 10000 == 0 {
                let elapsed = start.elapsed().as_secs_f64();
                eprint!(
                    "\r   Generated {}/{} ({:.1} MB, {:.0} msg/s)",
                    written,
                    count,
                    bytes_written as f64 / 1_000_000.0,
                    written as f64 / elapsed
                );
            }
        }

        // Silence between bursts: 30 minutes to 2 days
        clock += Duration::minutes(rng.gen_range(30..2880));
    }

    writer.flush().unwrap();

    let elapsed = start.elapsed();
    println!("\n\n✅ Done!");
    println!("   Size: {:.2} MB", bytes_written as f64 / 1_000_000.0);
    println!("   Time: {:.2}s", elapsed.as_secs_f64());
    println!(
        "   Speed: {:.0} msg/s",
        count as f64 / elapsed.as_secs_f64()
    );
}
