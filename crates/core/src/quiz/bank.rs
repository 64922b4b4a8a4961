//! Offline question banks, one fixed set of 15 questions per topic.

use crate::model::QuestionId;

use super::question::{CHOICE_COUNT, Question, Topic};

/// Number of questions in every bank.
pub const BANK_SIZE: usize = 15;

/// Returns the bank for `topic`, in storage order.
#[must_use]
pub fn bank(topic: Topic) -> &'static [Question; BANK_SIZE] {
    match topic {
        Topic::PriceControls => &PRICE_CONTROLS,
        Topic::QuotaTariff => &QUOTA_TARIFF,
        Topic::Shifts => &SHIFTS,
    }
}

const fn q(
    id: u32,
    topic: Topic,
    prompt: &'static str,
    choices: [&'static str; CHOICE_COUNT],
    correct_index: usize,
) -> Question {
    Question {
        id: QuestionId::new(id),
        topic,
        prompt,
        choices,
        correct_index,
    }
}

use super::question::Topic::{PriceControls as PC, QuotaTariff as QT, Shifts as SH};

#[rustfmt::skip]
static PRICE_CONTROLS: [Question; BANK_SIZE] = [
    q(101, PC, "Fill in the blank: A binding price ceiling creates a ____.",
        ["shortage", "surplus", "equilibrium", "higher producer surplus"], 0),
    q(102, PC, "Fill in the blank: A binding price floor creates a ____.",
        ["surplus", "shortage", "equilibrium", "no change in quantity"], 0),
    q(103, PC, "Fill in the blank: A price ceiling is set ____ the equilibrium price.",
        ["below", "above", "equal to", "independent of"], 0),
    q(104, PC, "Fill in the blank: A price floor is set ____ the equilibrium price.",
        ["above", "below", "equal to", "independent of"], 0),
    q(105, PC, "Under a binding price ceiling, quantity demanded is ____ quantity supplied.",
        ["greater than", "less than", "equal to", "unrelated to"], 0),
    q(106, PC, "Under a binding price floor, quantity supplied is ____ quantity demanded.",
        ["greater than", "less than", "equal to", "unrelated to"], 0),
    q(107, PC, "Both price ceilings and price floors typically cause:",
        ["deadweight loss", "perfect efficiency", "higher total surplus", "no market distortion"], 0),
    q(108, PC, "With a binding price ceiling, the quantity actually traded (relative to equilibrium) usually:",
        ["decreases", "increases", "stays the same", "becomes infinite"], 0),
    q(109, PC, "With a binding price floor, the quantity actually traded (relative to equilibrium) usually:",
        ["decreases", "increases", "stays the same", "becomes infinite"], 0),
    q(110, PC, "A common example of a price ceiling is:",
        ["rent control", "minimum wage", "a tariff", "a quota"], 0),
    q(111, PC, "A common example of a price floor is:",
        ["minimum wage", "rent control", "a subsidy", "a sales tax"], 0),
    q(112, PC, "If a price ceiling is NOT binding (set above equilibrium), then:",
        ["it has no effect on the market outcome", "it creates a shortage", "it creates a surplus", "it shifts demand left"], 0),
    q(113, PC, "A binding price ceiling can lead to non-price rationing (like waiting in line) because:",
        ["the price cannot rise to clear the market", "supply increases automatically", "demand decreases automatically", "it eliminates scarcity"], 0),
    q(114, PC, "When a price floor is binding, which is most likely true?",
        ["some goods go unsold", "a shortage occurs", "quantity traded increases above equilibrium", "demand shifts right"], 0),
    q(115, PC, "If the government sets a binding price floor, the market price is typically:",
        ["at the floor (or above), not below it", "below the floor", "always equal to equilibrium", "zero"], 0),
];

#[rustfmt::skip]
static QUOTA_TARIFF: [Question; BANK_SIZE] = [
    q(201, QT, "A quota is a legal limit on ____.",
        ["the quantity traded", "the price", "consumer income", "firm profits"], 0),
    q(202, QT, "A quota typically results in:",
        ["deadweight loss", "perfect efficiency", "more total surplus", "no change in equilibrium"], 0),
    q(203, QT, "A quota creates a wedge between:",
        ["buyers’ price and sellers’ price", "supply and demand curves", "two demand curves", "two supply curves"], 0),
    q(204, QT, "A tariff is best described as a tax on:",
        ["imports", "exports", "all goods", "only services"], 0),
    q(205, QT, "A tariff on an imported input (e.g., aluminum) tends to shift the domestic supply curve:",
        ["left", "right", "does not shift", "becomes perfectly elastic"], 0),
    q(206, QT, "When supply shifts left, equilibrium price ____ and equilibrium quantity ____.",
        ["rises; falls", "falls; rises", "rises; rises", "falls; falls"], 0),
    q(207, QT, "A binding quota (restricting supply) usually makes the market price:",
        ["higher", "lower", "unchanged", "zero"], 0),
    q(208, QT, "Who benefits from a binding quota depends on who receives the:",
        ["quota rents", "consumer surplus", "tax refunds", "imports"], 0),
    q(209, QT, "Compared to a tariff, a quota is more likely to create:",
        ["quota rents", "government tax revenue", "a subsidy", "perfect competition"], 0),
    q(210, QT, "Deadweight loss from a quota comes from:",
        ["trades that no longer happen", "higher quality products", "lower costs", "more efficient markets"], 0),
    q(211, QT, "A quota that restricts imports tends to:",
        ["raise domestic price and reduce quantity", "lower domestic price and increase quantity", "leave price unchanged", "eliminate deadweight loss"], 0),
    q(212, QT, "A tariff on imports typically creates government:",
        ["revenue", "quota rents", "a surplus in every market", "perfect competition"], 0),
    q(213, QT, "Compared to a quota, a tariff is more likely to generate:",
        ["tax revenue for the government", "quota rents for license holders", "no deadweight loss", "a binding price ceiling"], 0),
    q(214, QT, "If a tariff raises costs for producers, the supply curve shifts ____ and equilibrium price ____.",
        ["left; rises", "right; rises", "left; falls", "right; falls"], 0),
    q(215, QT, "The deadweight loss from a tariff comes from:",
        ["mutually beneficial trades that no longer occur", "extra trades that occur", "lower prices for consumers", "higher production efficiency"], 0),
];

#[rustfmt::skip]
static SHIFTS: [Question; BANK_SIZE] = [
    q(301, SH, "If demand increases (shifts right) and supply is unchanged, equilibrium price ____ and quantity ____.",
        ["rises; rises", "falls; falls", "rises; falls", "falls; rises"], 0),
    q(302, SH, "If demand decreases (shifts left) and supply is unchanged, equilibrium price ____ and quantity ____.",
        ["falls; falls", "rises; rises", "rises; falls", "falls; rises"], 0),
    q(303, SH, "If supply increases (shifts right) and demand is unchanged, equilibrium price ____ and quantity ____.",
        ["falls; rises", "rises; falls", "rises; rises", "falls; falls"], 0),
    q(304, SH, "If supply decreases (shifts left) and demand is unchanged, equilibrium price ____ and quantity ____.",
        ["rises; falls", "falls; rises", "rises; rises", "falls; falls"], 0),
    q(305, SH, "A tariff on an important input is most likely to cause:",
        ["supply to shift left", "demand to shift right", "supply to shift right", "demand to shift left"], 0),
    q(306, SH, "If a city wins a championship and demand for merch rises, the demand curve shifts:",
        ["right", "left", "up the curve only", "down the curve only"], 0),
    q(307, SH, "A movement ALONG a demand curve is caused by:",
        ["a change in price of the good", "a change in income", "a change in tastes", "a change in population"], 0),
    q(308, SH, "A shift of the demand curve can be caused by:",
        ["a change in income", "a change in the good’s price", "a change in the good’s quantity supplied", "a price ceiling"], 0),
    q(309, SH, "An increase in production costs will shift supply:",
        ["left", "right", "not at all", "along the curve only"], 0),
    q(310, SH, "If both demand and supply increase, equilibrium quantity ____ and equilibrium price is:",
        ["higher; ambiguous", "lower; ambiguous", "higher; definitely lower", "lower; definitely higher"], 0),
    q(311, SH, "If demand increases and supply decreases, equilibrium price is ____ and equilibrium quantity is ____.",
        ["higher; ambiguous", "lower; ambiguous", "higher; higher", "lower; lower"], 0),
    q(312, SH, "If demand decreases and supply increases, equilibrium price is ____ and equilibrium quantity is ____.",
        ["lower; ambiguous", "higher; ambiguous", "higher; higher", "lower; lower"], 0),
    q(313, SH, "A new technology that reduces production costs shifts supply:",
        ["right", "left", "up the curve only", "down the curve only"], 0),
    q(314, SH, "An increase in consumer income (for a normal good) shifts demand:",
        ["right", "left", "along the curve only", "does not change demand"], 0),
    q(315, SH, "A decrease in the price of a complement shifts demand for this good:",
        ["right", "left", "along the curve only", "does not change demand"], 0),
];
