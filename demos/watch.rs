//! Discovers a device of the given class and prints its events as they arrive.

use std::{env, error::Error, process, thread, time::Duration};

use evpeek::{Device, DeviceClass, ReadOutcome, find_device_path};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let class = match &*env::args().skip(1).collect::<Vec<_>>() {
        [class] if class == "kbd" => DeviceClass::Keyboard,
        [class] if class == "mouse" => DeviceClass::Mouse,
        _ => {
            eprintln!("usage: {} <kbd|mouse>", env!("CARGO_CRATE_NAME"));
            process::exit(1);
        }
    };

    let alias = find_device_path(class)?;
    println!("watching {}", alias.path().display());
    let dev = Device::open(alias.path())?;

    loop {
        match dev.read_event() {
            ReadOutcome::Event(event) => println!("{event:?}"),
            ReadOutcome::NoEvent => thread::sleep(Duration::from_millis(5)),
            ReadOutcome::Failed(e) => {
                dev.close();
                return Err(e.into());
            }
        }
    }
}
