//! A seeded single-server queueing scenario: one participant modeling a
//! service desk, drawing exponential inter-arrival and service times, and
//! winding the simulation down by cancelling its own remaining events.

use simsched::{Schedule, ScheduledEvent, Scheduler, SimObject, SimTime};

use rand::SeedableRng;
use rand_distr::{Distribution, Exp};
use rand_pcg::Pcg64;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

const ARRIVAL_RATE: f64 = 4.0;
const SERVICE_RATE: f64 = 6.0;
const CUSTOMERS: usize = 200;

struct Desk {
    schedule: Schedule,
    rng: Pcg64,
    arrival_distr: Exp<f64>,
    service_distr: Exp<f64>,
    waiting: VecDeque<f64>, // arrival instants of queued customers
    serving: Option<f64>,   // arrival instant of the customer at the counter
    arrivals_created: usize,
    customers_served: usize,
    total_time_in_system: f64,
    last_event_time: f64,
}

impl Desk {
    fn new(rng: Pcg64) -> Self {
        Desk {
            schedule: Schedule::new(),
            rng,
            arrival_distr: Exp::new(ARRIVAL_RATE).unwrap(),
            service_distr: Exp::new(SERVICE_RATE).unwrap(),
            waiting: VecDeque::new(),
            serving: None,
            arrivals_created: 0,
            customers_served: 0,
            total_time_in_system: 0.0,
            last_event_time: 0.0,
        }
    }

    fn begin_service(&mut self, arrival_instant: f64, now: SimTime) -> simsched::Result {
        self.serving = Some(arrival_instant);
        let service_delay = self.service_distr.sample(&mut self.rng);
        self.schedule.schedule_event(now + service_delay, "departure")?;
        Ok(())
    }
}

impl SimObject for Desk {
    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    fn advance(&mut self, delta_secs: f64) {
        assert!(delta_secs > 0.0, "advance must only report forward motion");
    }

    fn on_event(&mut self, event: &ScheduledEvent, scheduler: &mut Scheduler) -> simsched::Result {
        let now = scheduler.current_time();
        assert!(
            now.as_secs() >= self.last_event_time,
            "events arrived out of time order"
        );
        self.last_event_time = now.as_secs();

        if event.is_kind("arrival")? {
            if self.serving.is_none() {
                self.begin_service(now.as_secs(), now)?;
            } else {
                self.waiting.push_back(now.as_secs());
            }
            if self.arrivals_created < CUSTOMERS {
                self.arrivals_created += 1;
                let delay = self.arrival_distr.sample(&mut self.rng);
                self.schedule.schedule_event(now + delay, "arrival")?;
            }
        } else if event.is_kind("departure")? {
            if let Some(arrived) = self.serving.take() {
                self.customers_served += 1;
                self.total_time_in_system += now.as_secs() - arrived;
            }
            if self.customers_served == CUSTOMERS {
                // Enough samples; drop whatever is still pending.
                self.schedule.unschedule_all();
            } else if let Some(next_customer) = self.waiting.pop_front() {
                self.begin_service(next_customer, now)?;
            }
        }
        Ok(())
    }
}

#[test]
fn seeded_queue_runs_to_completion() {
    let desk = Rc::new(RefCell::new(Desk::new(Pcg64::seed_from_u64(271828))));

    let mut scheduler = Scheduler::new();
    scheduler.add_participant(desk.clone());
    {
        let mut d = desk.borrow_mut();
        d.arrivals_created = 1;
        d.schedule_mut()
            .schedule_event(SimTime::from_secs(0.1), "arrival")
            .unwrap();
    }

    while scheduler.advance_to_next_event().unwrap() {}

    let desk = desk.borrow();
    assert_eq!(desk.customers_served, CUSTOMERS);
    assert!(desk.schedule().is_empty());
    assert!(scheduler.current_time() > SimTime::ZERO);

    // Every customer spent at least its service time in the system.
    assert!(desk.total_time_in_system > 0.0);
    let mean_time_in_system = desk.total_time_in_system / CUSTOMERS as f64;
    assert!(
        mean_time_in_system < 100.0,
        "mean time in system {mean_time_in_system} is implausible for these rates"
    );
}

#[test]
fn identical_seeds_reproduce_the_same_run() {
    let run = |seed: u64| -> (usize, f64, f64) {
        let desk = Rc::new(RefCell::new(Desk::new(Pcg64::seed_from_u64(seed))));
        let mut scheduler = Scheduler::new();
        scheduler.add_participant(desk.clone());
        {
            let mut d = desk.borrow_mut();
            d.arrivals_created = 1;
            d.schedule_mut()
                .schedule_event(SimTime::from_secs(0.1), "arrival")
                .unwrap();
        }
        while scheduler.advance_to_next_event().unwrap() {}
        let end = scheduler.current_time().as_secs();
        let desk = desk.borrow();
        (desk.customers_served, desk.total_time_in_system, end)
    };

    assert_eq!(run(7), run(7));
}
