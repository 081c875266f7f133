//! Randomized pendulum: resample pole mass and joint damping every episode.

use simmod::{
    BodyModifier, Environment, JointModifier, ModelBuilder, PARAMETER_VALUE_KEY, PendulumEnv,
    RandomizedEnv, Result, Simulation, UniformDomainRandomization, parse_config,
};

fn main() -> Result<()> {
    let model = ModelBuilder::new()
        .dt(0.002)
        .add_rod("arm", "base_motor", 0.095, 0.085)
        .add_rod("pole", "arm_pole", 0.024, 0.129)
        .build();
    let sim = Simulation::new(model).into_handle();

    let bodies = parse_config(r#"{ "pole": { "mass": { "range": [0.01, 0.1] } } }"#)?;
    let joints = parse_config(
        r#"{ "arm_pole": { "damping": { "range": [-11.5, -7.0], "distribution": "loguniform" } } }"#,
    )?;
    let alg = UniformDomainRandomization::new(
        vec![
            Box::new(BodyModifier::new(sim.clone(), Some(&bodies))?),
            Box::new(JointModifier::new(sim.clone(), Some(&joints))?),
        ],
        42u64,
    );

    let mut env = RandomizedEnv::new(PendulumEnv::new(sim.clone(), 500).with_initial_angle(0.3), alg);

    println!("episode  mass(kg)   damping      return");
    println!("──────────────────────────────────────────");
    for episode in 0..5 {
        env.reset()?;
        let mut total = 0.0;
        loop {
            let transition = env.step(&vec![0.0, 0.0])?;
            total += transition.reward;
            if transition.done {
                break;
            }
        }
        let sim = sim.borrow();
        println!(
            "{episode:>7}  {:.5}    {:.3e}    {total:.3}",
            sim.model.bodies[1].mass, sim.model.joints[1].damping
        );
    }

    println!("\nLast applied values: {}", env.metadata()[PARAMETER_VALUE_KEY]);
    Ok(())
}
