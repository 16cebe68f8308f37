use powerdrill_core::{compute_reward, RewardTier};

pub fn run(score: u32, total: u32) -> Result<(), Box<dyn std::error::Error>> {
    if score > total {
        return Err(format!("score {score} cannot exceed total {total}").into());
    }
    println!("{}", compute_reward(score, total));
    Ok(())
}

pub fn table() -> Result<(), Box<dyn std::error::Error>> {
    for tier in RewardTier::ALL {
        println!("{:>7}  {}", tier.band(), tier.description());
    }
    Ok(())
}
