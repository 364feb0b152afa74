// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::SystemTime;

// This atomic isn't for anything critical, just to generate unique IDs
// without locks. The worst that can happen if the load and store orderings
// are wrong is that the IDs are not actually unique.
static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a unique-enough ID, used to tell client instances apart and to
/// name generated temporary files.
pub(crate) fn generate_random_id() -> i64 {
    if LAST_ID.load(Ordering::SeqCst) == 0 {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("system time is before epoch")
            .as_nanos() as i64;

        let _ = LAST_ID.compare_exchange(0, now, Ordering::SeqCst, Ordering::SeqCst);
    }

    LAST_ID.fetch_add(1, Ordering::SeqCst)
}
